use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `DeclSecurity` table attaches declarative security permission sets
/// to types, methods and assemblies. `TableId` = 0x0E
#[derive(Clone, Debug)]
pub struct DeclSecurityRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// the security action code
    pub action: u16,
    /// a `HasDeclSecurity` coded index naming the protected entity
    pub parent: CodedIndex,
    /// an index into the Blob heap holding the permission set
    pub permission_set: u32,
}

impl TableRow for DeclSecurityRaw {
    const TABLE_ID: TableId = TableId::DeclSecurity;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* action */         2 +
            /* parent */         sizes.coded_index_bytes(CodedIndexType::HasDeclSecurity) +
            /* permission_set */ sizes.blob_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(DeclSecurityRaw {
            rid,
            token: Token::from_table(TableId::DeclSecurity, rid),
            offset: *offset,
            action: read_le_at::<u16>(data, offset)?,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasDeclSecurity)?,
            permission_set: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
