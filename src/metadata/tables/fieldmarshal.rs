use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `FieldMarshal` table links fields and parameters to their native
/// marshalling descriptors. `TableId` = 0x0D
#[derive(Clone, Debug)]
pub struct FieldMarshalRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a `HasFieldMarshal` coded index naming the owner
    pub parent: CodedIndex,
    /// an index into the Blob heap holding the marshalling descriptor
    pub native_type: u32,
}

impl TableRow for FieldMarshalRaw {
    const TABLE_ID: TableId = TableId::FieldMarshal;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* parent */      sizes.coded_index_bytes(CodedIndexType::HasFieldMarshal) +
            /* native_type */ sizes.blob_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldMarshalRaw {
            rid,
            token: Token::from_table(TableId::FieldMarshal, rid),
            offset: *offset,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasFieldMarshal)?,
            native_type: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
