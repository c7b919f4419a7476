use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{CodedIndexType, TableId},
    Error::InvalidCodedIndex,
    Result,
};

/// Row count and index-width information for a single table.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// The count of rows in this table
    pub rows: u32,
    /// Number of bits required to represent any valid row index
    pub bits: u8,
    /// If the count exceeds `u16::MAX`, indexes of other tables into this
    /// table are 4 bytes instead of 2
    pub is_large: bool,
}

impl TableRowInfo {
    /// Creates a new `TableRowInfo` for the given row count.
    ///
    /// ## Arguments
    /// * `rows` - The number of rows in the table
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts and reference index widths for every table in an image.
///
/// Built once from the tables stream header; every row parser consults it
/// to decide whether a heap index, table index or coded index column is 2
/// or 4 bytes wide.
#[derive(Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_index_bits: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Cheap-copy reference to a [`TableInfo`] structure
pub type TableInfoRef = Arc<TableInfo>;

/// Number of bits needed for the tag of a coded index with `candidates`
/// candidate tables.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coded_tag_bits(candidates: usize) -> u8 {
    candidates.next_power_of_two().trailing_zeros() as u8
}

impl TableInfo {
    /// Build a `TableInfo` from the raw `#~` stream bytes.
    ///
    /// Row counts are read from offset 24 onwards, one `u32` per set bit in
    /// `valid`, heap widths from the `heap_sizes` byte at offset 6.
    ///
    /// ## Arguments
    /// * 'data'         - The full `#~` stream
    /// * '`valid_bitvec`' - The `valid` mask naming which tables are present
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when `valid` names an unknown
    /// table, carries a zero row count, or a row count exceeds the 24-bit
    /// RID space
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); TableId::GenericParamConstraint as usize + 1];
        let mut next_row_offset = 24;

        for bit in 0..64u64 {
            if (valid_bitvec & (1 << bit)) == 0 {
                continue;
            }

            let Some(table_id) = TableId::from_repr(bit as usize) else {
                return Err(malformed_error!(
                    "Tables stream names unsupported table 0x{:02x}",
                    bit
                ));
            };

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if row_count == 0 {
                return Err(malformed_error!(
                    "Tables stream marks {:?} present with zero rows",
                    table_id
                ));
            }
            if row_count > 0x00FF_FFFF {
                return Err(malformed_error!(
                    "Row count of {:?} exceeds the RID space - {}",
                    table_id,
                    row_count
                ));
            }

            rows[table_id as usize] = TableRowInfo::new(row_count);
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        let mut table_info = TableInfo {
            rows,
            coded_index_bits: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 0x01 != 0,
            is_large_index_guid: heap_size_flags & 0x02 != 0,
            is_large_index_blob: heap_size_flags & 0x04 != 0,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Test constructor building a `TableInfo` from explicit row counts.
    ///
    /// ## Arguments
    /// * 'valid_tables' - `(table, row_count)` pairs of the present tables
    /// * 'large_str'    - 4-byte #Strings indexes when true
    /// * 'large_blob'   - 4-byte #Blob indexes when true
    /// * 'large_guid'   - 4-byte #GUID indexes when true
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::GenericParamConstraint as usize + 1],
            coded_index_bits: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table, count) in valid_tables {
            table_info.rows[*table as usize] = TableRowInfo::new(*count);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Decode a coded index value into its target table and row index.
    ///
    /// ## Arguments
    /// * `value`            - The encoded value
    /// * `coded_index_type` - The coded index category being decoded
    ///
    /// # Errors
    /// Returns [`InvalidCodedIndex`] if the tag has no candidate table
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_tag_bits(tables.len());
        let tag = value & ((1 << tag_bits) - 1);

        match tables.get(tag as usize) {
            Some(table) => Ok((*table, value >> tag_bits)),
            None => Err(InvalidCodedIndex(tag)),
        }
    }

    /// Encode a `(table, rid)` pair into a coded index value.
    ///
    /// ## Arguments
    /// * `table`            - The candidate table being referenced
    /// * `rid`              - The 1-based row index (0 encodes nil)
    /// * `coded_index_type` - The coded index category
    ///
    /// # Errors
    /// Returns [`InvalidCodedIndex`] if `table` is not a candidate of the
    /// category
    pub fn encode_coded_index(
        &self,
        table: TableId,
        rid: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<u32> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_tag_bits(tables.len());

        match tables.iter().position(|candidate| *candidate == table) {
            #[allow(clippy::cast_possible_truncation)]
            Some(tag) => Ok((rid << tag_bits) | tag as u32),
            None => Err(InvalidCodedIndex(table as u32)),
        }
    }

    /// True if indexes into `id` require 4 bytes instead of 2
    ///
    /// ## Arguments
    /// * `id` - The `TableId` to query
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// True if indexes into the '#Strings' heap are 4 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// True if indexes into the '#GUID' heap are 4 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// True if indexes into the '#Blob' heap are 4 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Byte width of a '#Strings' heap index column (2 or 4)
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Byte width of a '#GUID' heap index column (2 or 4)
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Byte width of a '#Blob' heap index column (2 or 4)
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Row count and width metadata for a specific table
    ///
    /// ## Arguments
    /// * `table` - The `TableId` to query
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Number of bits required to represent an index into a table
    ///
    /// ## Arguments
    /// * `table_id` - The `TableId` to query
    #[must_use]
    pub fn table_index_bits(&self, table_id: TableId) -> u8 {
        self.rows[table_id as usize].bits
    }

    /// Byte width of an index column into a table (2 or 4)
    ///
    /// ## Arguments
    /// * `table_id` - The `TableId` to query
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].is_large {
            4
        } else {
            2
        }
    }

    /// Cached bit size of a coded index category
    ///
    /// ## Arguments
    /// * `coded_index_type` - The category to query
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_index_bits[coded_index_type as usize]
    }

    /// Byte width of a coded index column (2 or 4)
    ///
    /// ## Arguments
    /// * `coded_index_type` - The category to query
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_index_bits[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    fn calculate_coded_index_size(&self, coded_index_type: CodedIndexType) -> u8 {
        let tables = coded_index_type.tables();
        let max_bits = tables
            .iter()
            .map(|table| self.table_index_bits(*table))
            .max()
            .unwrap_or(1);

        max_bits + coded_tag_bits(tables.len())
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            self.coded_index_bits[coded_index as usize] =
                self.calculate_coded_index_size(coded_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_info_bits() {
        assert_eq!(TableRowInfo::new(0).bits, 1);
        assert_eq!(TableRowInfo::new(1).bits, 1);
        assert_eq!(TableRowInfo::new(2).bits, 2);
        assert_eq!(TableRowInfo::new(0xFFFF).bits, 16);
        assert!(!TableRowInfo::new(0xFFFF).is_large);
        assert!(TableRowInfo::new(0x1_0000).is_large);
    }

    #[test]
    fn tag_bits() {
        assert_eq!(coded_tag_bits(1), 0);
        assert_eq!(coded_tag_bits(2), 1);
        assert_eq!(coded_tag_bits(3), 2);
        assert_eq!(coded_tag_bits(5), 3);
        assert_eq!(coded_tag_bits(22), 5);
    }

    #[test]
    fn coded_index_width_small() {
        // 3 candidates, 2 tag bits: up to 0x3FFF rows fit in 2 bytes
        let info = TableInfo::new_test(
            &[(TableId::TypeDef, 0x3FFF), (TableId::TypeRef, 10)],
            false,
            false,
            false,
        );
        assert_eq!(info.coded_index_bytes(CodedIndexType::TypeDefOrRef), 2);

        let info = TableInfo::new_test(&[(TableId::TypeDef, 0x4000)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexType::TypeDefOrRef), 4);
    }

    #[test]
    fn coded_index_roundtrip() {
        let info = TableInfo::new_test(&[(TableId::TypeSpec, 4)], false, false, false);

        let encoded = info
            .encode_coded_index(TableId::TypeSpec, 2, CodedIndexType::TypeDefOrRef)
            .unwrap();
        assert_eq!(encoded, 0b1010);

        let (table, rid) = info
            .decode_coded_index(encoded, CodedIndexType::TypeDefOrRef)
            .unwrap();
        assert_eq!(table, TableId::TypeSpec);
        assert_eq!(rid, 2);
    }

    #[test]
    fn coded_index_bad_tag() {
        let info = TableInfo::new_test(&[(TableId::TypeDef, 4)], false, false, false);
        // tag 3 has no candidate in TypeDefOrRef
        assert!(matches!(
            info.decode_coded_index(0b0011, CodedIndexType::TypeDefOrRef),
            Err(InvalidCodedIndex(3))
        ));
        // Field is not a TypeDefOrRef candidate
        assert!(info
            .encode_coded_index(TableId::Field, 1, CodedIndexType::TypeDefOrRef)
            .is_err());
    }

    #[test]
    fn header_validation() {
        // header: 24 bytes, valid bit for TypeDef (0x02) with a row count of 0
        let mut data = vec![0u8; 28];
        data[8] = 0x04; // valid = 1 << 2
        assert!(TableInfo::new(&data, 1 << 2).is_err());

        // unknown table bit 0x1E
        let data = vec![0u8; 28];
        assert!(TableInfo::new(&data, 1 << 0x1E).is_err());
    }
}
