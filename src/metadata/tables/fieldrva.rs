use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `FieldRVA` table locates the initial data of fields with the
/// `HAS_FIELD_RVA` flag. `TableId` = 0x1D
#[derive(Clone, Debug)]
pub struct FieldRvaRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// RVA of the field's initial data
    pub rva: u32,
    /// an index into the Field table
    pub field: u32,
}

impl TableRow for FieldRvaRaw {
    const TABLE_ID: TableId = TableId::FieldRVA;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* rva */   4 +
            /* field */ sizes.table_index_bytes(TableId::Field)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldRvaRaw {
            rid,
            token: Token::from_table(TableId::FieldRVA, rid),
            offset: *offset,
            rva: read_le_at::<u32>(data, offset)?,
            field: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
        })
    }
}
