use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `Module` table describes the current module; it holds exactly one
/// row in a well-formed image. `TableId` = 0x00
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// Reserved, shall be 0 (used for edit-and-continue generation counts)
    pub generation: u16,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Guid heap; the module version identifier
    pub mvid: u32,
    /// an index into the Guid heap; reserved for edit-and-continue
    pub enc_id: u32,
    /// an index into the Guid heap; reserved for edit-and-continue
    pub enc_base_id: u32,
}

impl TableRow for ModuleRaw {
    const TABLE_ID: TableId = TableId::Module;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* generation */    2 +
            /* name */          sizes.str_bytes() +
            /* mvid */          sizes.guid_bytes() +
            /* enc_id */        sizes.guid_bytes() +
            /* enc_base_id */   sizes.guid_bytes()
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ModuleRaw {
            rid,
            token: Token::from_table(TableId::Module, rid),
            offset: *offset,
            generation: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            mvid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            enc_id: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            enc_base_id: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};
    use std::sync::Arc;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x00, 0x00, // generation
            0x42, 0x00, // name
            0x01, 0x00, // mvid
            0x00, 0x00, // enc_id
            0x00, 0x00, // enc_base_id
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Module, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<ModuleRaw>::new(&data, 1, sizes).unwrap();

        let row = table.row(1).unwrap();
        assert_eq!(row.token.value(), 0x0000_0001);
        assert_eq!(row.generation, 0);
        assert_eq!(row.name, 0x42);
        assert_eq!(row.mvid, 1);
        assert_eq!(row.enc_id, 0);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x00, // generation
            0x04, 0x03, 0x02, 0x01, // name
            0x08, 0x07, 0x06, 0x05, // mvid
            0x0C, 0x0B, 0x0A, 0x09, // enc_id
            0x10, 0x0F, 0x0E, 0x0D, // enc_base_id
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::Module, 1)], true, true, true));
        let table = MetadataTable::<ModuleRaw>::new(&data, 1, sizes).unwrap();

        let row = table.row(1).unwrap();
        assert_eq!(row.generation, 1);
        assert_eq!(row.name, 0x0102_0304);
        assert_eq!(row.mvid, 0x0506_0708);
        assert_eq!(row.enc_base_id, 0x0D0E_0F10);
    }
}
