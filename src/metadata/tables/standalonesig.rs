use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `StandAloneSig` table holds signatures that are referenced by
/// token rather than by another table's column (local variable signatures,
/// indirect call sites). `TableId` = 0x11
#[derive(Clone, Debug)]
pub struct StandAloneSigRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Blob heap holding the signature
    pub signature: u32,
}

impl TableRow for StandAloneSigRaw {
    const TABLE_ID: TableId = TableId::StandAloneSig;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.blob_bytes())
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(StandAloneSigRaw {
            rid,
            token: Token::from_table(TableId::StandAloneSig, rid),
            offset: *offset,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
