use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `ManifestResource` table names the resources of the assembly
/// manifest. `TableId` = 0x28
#[derive(Clone, Debug)]
pub struct ManifestResourceRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// byte offset of the resource within its file
    pub resource_offset: u32,
    /// a 4-byte bitmask of type `ManifestResourceAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an Implementation coded index; nil means the current file
    pub implementation: CodedIndex,
}

impl TableRow for ManifestResourceRaw {
    const TABLE_ID: TableId = TableId::ManifestResource;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* resource_offset */ 4 +
            /* flags */           4 +
            /* name */            sizes.str_bytes() +
            /* implementation */  sizes.coded_index_bytes(CodedIndexType::Implementation)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ManifestResourceRaw {
            rid,
            token: Token::from_table(TableId::ManifestResource, rid),
            offset: *offset,
            resource_offset: read_le_at::<u32>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            implementation: CodedIndex::read(data, offset, sizes, CodedIndexType::Implementation)?,
        })
    }
}
