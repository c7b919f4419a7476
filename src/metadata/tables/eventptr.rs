use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `EventPtr` table adds a level of indirection between `EventMap`
/// runs and the Event table in unoptimized images. `TableId` = 0x13
#[derive(Clone, Debug)]
pub struct EventPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Event table
    pub event: u32,
}

impl TableRow for EventPtrRaw {
    const TABLE_ID: TableId = TableId::EventPtr;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::Event))
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventPtrRaw {
            rid,
            token: Token::from_table(TableId::EventPtr, rid),
            offset: *offset,
            event: read_le_at_dyn(data, offset, sizes.is_large(TableId::Event))?,
        })
    }
}
