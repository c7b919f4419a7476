use crate::{
    file::io::read_le_at,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `AssemblyProcessor` table is deprecated and shall be ignored by
/// conforming implementations; it is parsed only for offset computation.
/// `TableId` = 0x21
#[derive(Clone, Debug)]
pub struct AssemblyProcessorRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// processor architecture identifier
    pub processor: u32,
}

impl TableRow for AssemblyProcessorRaw {
    const TABLE_ID: TableId = TableId::AssemblyProcessor;

    fn row_size(_sizes: &TableInfoRef) -> u32 {
        4
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, _sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyProcessorRaw {
            rid,
            token: Token::from_table(TableId::AssemblyProcessor, rid),
            offset: *offset,
            processor: read_le_at::<u32>(data, offset)?,
        })
    }
}
