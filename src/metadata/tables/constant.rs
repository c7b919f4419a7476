use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The Constant table stores compile-time constant values for fields,
/// parameters and properties. `TableId` = 0x0B
#[derive(Clone, Debug)]
pub struct ConstantRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// the element type of the constant (one byte, one byte padding)
    pub base: u8,
    /// a `HasConstant` coded index naming the owner
    pub parent: CodedIndex,
    /// an index into the Blob heap holding the value
    pub value: u32,
}

impl TableRow for ConstantRaw {
    const TABLE_ID: TableId = TableId::Constant;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* base + padding */ 2 +
            /* parent */         sizes.coded_index_bytes(CodedIndexType::HasConstant) +
            /* value */          sizes.blob_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let base = read_le_at::<u8>(data, offset)?;
        let _padding = read_le_at::<u8>(data, offset)?;

        Ok(ConstantRaw {
            rid,
            token: Token::from_table(TableId::Constant, rid),
            offset: *offset,
            base,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasConstant)?,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
