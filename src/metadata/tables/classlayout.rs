use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef, TableRow},
        token::Token,
    },
    Result,
};

/// The `ClassLayout` table holds explicit packing and size information for
/// types with sequential or explicit layout. `TableId` = 0x0F
#[derive(Clone, Debug)]
pub struct ClassLayoutRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// packing alignment in bytes (power of two)
    pub packing_size: u16,
    /// total size of the type in bytes (0 when unconstrained)
    pub class_size: u32,
    /// an index into the `TypeDef` table
    pub parent: u32,
}

impl TableRow for ClassLayoutRaw {
    const TABLE_ID: TableId = TableId::ClassLayout;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* packing_size */ 2 +
            /* class_size */   4 +
            /* parent */       sizes.table_index_bytes(TableId::TypeDef)
        )
    }

    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ClassLayoutRaw {
            rid,
            token: Token::from_table(TableId::ClassLayout, rid),
            offset: *offset,
            packing_size: read_le_at::<u16>(data, offset)?,
            class_size: read_le_at::<u32>(data, offset)?,
            parent: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
        })
    }
}
