use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `AssemblyRefProcessor` table is deprecated and shall be ignored by
/// conforming implementations; it is parsed only for offset computation.
/// `TableId` = 0x24
#[derive(Clone, Debug)]
pub struct AssemblyRefProcessorRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// processor architecture identifier
    pub processor: u32,
    /// an index into the `AssemblyRef` table
    pub assembly_ref: u32,
}

impl TableRow for AssemblyRefProcessorRaw {
    const TABLE_ID: TableId = TableId::AssemblyRefProcessor;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* processor */    4 +
            /* assembly_ref */ sizes.table_index_bytes(TableId::AssemblyRef)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRefProcessorRaw {
            rid,
            token: Token::from_table(TableId::AssemblyRefProcessor, rid),
            offset: *offset,
            processor: read_le_at::<u32>(data, offset)?,
            assembly_ref: read_le_at_dyn(data, offset, sizes.is_large(TableId::AssemblyRef))?,
        })
    }
}
