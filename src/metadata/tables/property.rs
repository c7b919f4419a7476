use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The Property table describes the properties of types; ownership is
/// encoded by the `PropertyMap` runs. `TableId` = 0x17
#[derive(Clone, Debug)]
pub struct PropertyRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `PropertyAttributes`
    pub flags: u16,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap holding the property signature
    pub signature: u32,
}

impl TableRow for PropertyRaw {
    const TABLE_ID: TableId = TableId::Property;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */     2 +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(PropertyRaw {
            rid,
            token: Token::from_table(TableId::Property, rid),
            offset: *offset,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
