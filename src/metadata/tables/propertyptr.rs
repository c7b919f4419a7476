use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `PropertyPtr` table adds a level of indirection between
/// `PropertyMap` runs and the Property table in unoptimized images.
/// `TableId` = 0x16
#[derive(Clone, Debug)]
pub struct PropertyPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Property table
    pub property: u32,
}

impl TableRow for PropertyPtrRaw {
    const TABLE_ID: TableId = TableId::PropertyPtr;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::Property))
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(PropertyPtrRaw {
            rid,
            token: Token::from_table(TableId::PropertyPtr, rid),
            offset: *offset,
            property: read_le_at_dyn(data, offset, sizes.is_large(TableId::Property))?,
        })
    }
}
