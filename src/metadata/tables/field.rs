use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

#[allow(non_snake_case)]
/// Flag constants for the Field flags column (`FieldAttributes`)
pub mod FieldAttributes {
    /// Mask selecting the accessibility bits
    pub const FIELD_ACCESS_MASK: u16 = 0x0007;
    /// Field is static
    pub const STATIC: u16 = 0x0010;
    /// Field may only be initialized, not written after initialization
    pub const INIT_ONLY: u16 = 0x0020;
    /// Field holds a compile-time constant
    pub const LITERAL: u16 = 0x0040;
    /// Field does not have to be serialized
    pub const NOT_SERIALIZED: u16 = 0x0080;
    /// Field name is special
    pub const SPECIAL_NAME: u16 = 0x0200;
    /// Field has a marshalling descriptor
    pub const HAS_FIELD_MARSHAL: u16 = 0x1000;
    /// Field has a default value
    pub const HAS_DEFAULT: u16 = 0x8000;
    /// Field has an RVA into initial data
    pub const HAS_FIELD_RVA: u16 = 0x0100;
}

/// The Field table holds the fields of all types; ownership is encoded by
/// the `TypeDef` `field_list` runs. `TableId` = 0x04
#[derive(Clone, Debug)]
pub struct FieldRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u16,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap holding the field signature
    pub signature: u32,
}

impl TableRow for FieldRaw {
    const TABLE_ID: TableId = TableId::Field;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */     2 +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldRaw {
            rid,
            token: Token::from_table(TableId::Field, rid),
            offset: *offset,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
