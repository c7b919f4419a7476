use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `MethodPtr` table adds a level of indirection between `TypeDef`
/// method runs and the `MethodDef` table in unoptimized images.
/// `TableId` = 0x05
#[derive(Clone, Debug)]
pub struct MethodPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `MethodDef` table
    pub method: u32,
}

impl TableRow for MethodPtrRaw {
    const TABLE_ID: TableId = TableId::MethodPtr;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::MethodDef))
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodPtrRaw {
            rid,
            token: Token::from_table(TableId::MethodPtr, rid),
            offset: *offset,
            method: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}
