use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `FieldPtr` table adds a level of indirection between `TypeDef`
/// field runs and the Field table in unoptimized images. `TableId` = 0x03
#[derive(Clone, Debug)]
pub struct FieldPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Field table
    pub field: u32,
}

impl TableRow for FieldPtrRaw {
    const TABLE_ID: TableId = TableId::FieldPtr;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::Field))
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldPtrRaw {
            rid,
            token: Token::from_table(TableId::FieldPtr, rid),
            offset: *offset,
            field: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
        })
    }
}
