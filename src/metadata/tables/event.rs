use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The Event table describes the events of types; ownership is encoded by
/// the `EventMap` runs. `TableId` = 0x14
#[derive(Clone, Debug)]
pub struct EventRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `EventAttributes`
    pub event_flags: u16,
    /// an index into the String heap
    pub name: u32,
    /// a `TypeDefOrRef` coded index naming the delegate type of the event
    pub event_type: CodedIndex,
}

impl TableRow for EventRaw {
    const TABLE_ID: TableId = TableId::Event;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* event_flags */ 2 +
            /* name */        sizes.str_bytes() +
            /* event_type */  sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventRaw {
            rid,
            token: Token::from_table(TableId::Event, rid),
            offset: *offset,
            event_flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            event_type: CodedIndex::read(data, offset, sizes, CodedIndexType::TypeDefOrRef)?,
        })
    }
}
