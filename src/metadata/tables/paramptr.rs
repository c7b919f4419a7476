use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `ParamPtr` table adds a level of indirection between `MethodDef`
/// parameter runs and the Param table in unoptimized images.
/// `TableId` = 0x07
#[derive(Clone, Debug)]
pub struct ParamPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Param table
    pub param: u32,
}

impl TableRow for ParamPtrRaw {
    const TABLE_ID: TableId = TableId::ParamPtr;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::Param))
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ParamPtrRaw {
            rid,
            token: Token::from_table(TableId::ParamPtr, rid),
            offset: *offset,
            param: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
        })
    }
}
