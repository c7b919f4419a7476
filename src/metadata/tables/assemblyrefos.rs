use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `AssemblyRefOS` table is deprecated and shall be ignored by
/// conforming implementations; it is parsed only for offset computation.
/// `TableId` = 0x25
#[derive(Clone, Debug)]
pub struct AssemblyRefOsRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// OS platform identifier
    pub os_platform_id: u32,
    /// OS major version
    pub os_major_version: u32,
    /// OS minor version
    pub os_minor_version: u32,
    /// an index into the `AssemblyRef` table
    pub assembly_ref: u32,
}

impl TableRow for AssemblyRefOsRaw {
    const TABLE_ID: TableId = TableId::AssemblyRefOS;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* os triple */    12 +
            /* assembly_ref */ sizes.table_index_bytes(TableId::AssemblyRef)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRefOsRaw {
            rid,
            token: Token::from_table(TableId::AssemblyRefOS, rid),
            offset: *offset,
            os_platform_id: read_le_at::<u32>(data, offset)?,
            os_major_version: read_le_at::<u32>(data, offset)?,
            os_minor_version: read_le_at::<u32>(data, offset)?,
            assembly_ref: read_le_at_dyn(data, offset, sizes.is_large(TableId::AssemblyRef))?,
        })
    }
}
