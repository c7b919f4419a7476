use crate::{
    file::io::read_le_at,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `AssemblyOS` table is deprecated and shall be ignored by conforming
/// implementations; it is parsed only for offset computation.
/// `TableId` = 0x22
#[derive(Clone, Debug)]
pub struct AssemblyOsRaw {
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
}

impl TableRow for AssemblyOsRaw {
    const TABLE_ID: TableId = TableId::AssemblyOS;

    fn row_size(_sizes: &TableInfoRef) -> u32 {
        12
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, _sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyOsRaw {
            rid,
            token: Token::from_table(TableId::AssemblyOS, rid),
            offset: *offset,
            os_platform_id: read_le_at::<u32>(data, offset)?,
            os_major_version: read_le_at::<u32>(data, offset)?,
            os_minor_version: read_le_at::<u32>(data, offset)?,
        })
    }
}
