use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `ImplMap` table holds P/Invoke mappings from managed methods to
/// unmanaged imports. `TableId` = 0x1C
#[derive(Clone, Debug)]
pub struct ImplMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `PInvokeAttributes`
    pub mapping_flags: u16,
    /// a `MemberForwarded` coded index naming the managed member
    pub member_forwarded: CodedIndex,
    /// an index into the String heap; the unmanaged entry point name
    pub import_name: u32,
    /// an index into the `ModuleRef` table; the unmanaged module
    pub import_scope: u32,
}

impl TableRow for ImplMapRaw {
    const TABLE_ID: TableId = TableId::ImplMap;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* mapping_flags */    2 +
            /* member_forwarded */ sizes.coded_index_bytes(CodedIndexType::MemberForwarded) +
            /* import_name */      sizes.str_bytes() +
            /* import_scope */     sizes.table_index_bytes(TableId::ModuleRef)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ImplMapRaw {
            rid,
            token: Token::from_table(TableId::ImplMap, rid),
            offset: *offset,
            mapping_flags: read_le_at::<u16>(data, offset)?,
            member_forwarded: CodedIndex::read(data, offset, sizes, CodedIndexType::MemberForwarded)?,
            import_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            import_scope: read_le_at_dyn(data, offset, sizes.is_large(TableId::ModuleRef))?,
        })
    }
}
