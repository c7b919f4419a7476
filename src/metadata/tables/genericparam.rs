use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `GenericParam` table describes the generic parameters of generic
/// types and methods. `TableId` = 0x2A
#[derive(Clone, Debug)]
pub struct GenericParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// 0-based ordinal of the parameter
    pub number: u16,
    /// a 2-byte bitmask of type `GenericParamAttributes`
    pub flags: u16,
    /// a `TypeOrMethodDef` coded index naming the owner
    pub owner: CodedIndex,
    /// an index into the String heap
    pub name: u32,
}

impl TableRow for GenericParamRaw {
    const TABLE_ID: TableId = TableId::GenericParam;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* number */ 2 +
            /* flags */  2 +
            /* owner */  sizes.coded_index_bytes(CodedIndexType::TypeOrMethodDef) +
            /* name */   sizes.str_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(GenericParamRaw {
            rid,
            token: Token::from_table(TableId::GenericParam, rid),
            offset: *offset,
            number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            owner: CodedIndex::read(data, offset, sizes, CodedIndexType::TypeOrMethodDef)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}
