//! The `#~` tables stream: header, typed table access and owner-run
//! decoding.
//!
//! The stream begins with a header naming which tables are present, their
//! row counts and the heap index widths; the rows of all present tables
//! follow back to back. Row sizes depend on those counts and widths, so
//! the stream computes every table's slice once during construction and
//! hands out typed [`MetadataTable`] views on demand.
//!
//! # Reference
//! - ECMA-335 II.24.2.6 and II.22

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::{
        ranges::MetadataRange,
        tables::{
            AssemblyOsRaw, AssemblyProcessorRaw, AssemblyRaw, AssemblyRefOsRaw,
            AssemblyRefProcessorRaw, AssemblyRefRaw, ClassLayoutRaw, ConstantRaw,
            CustomAttributeRaw, DeclSecurityRaw, EventMapRaw, EventPtrRaw, EventRaw,
            ExportedTypeRaw, FieldLayoutRaw, FieldMarshalRaw, FieldPtrRaw, FieldRaw, FieldRvaRaw,
            FileRaw, GenericParamConstraintRaw, GenericParamRaw, ImplMapRaw, InterfaceImplRaw,
            ManifestResourceRaw, MemberRefRaw, MetadataTable, MethodDefRaw, MethodImplRaw,
            MethodPtrRaw, MethodSemanticsRaw, MethodSpecRaw, ModuleRaw, ModuleRefRaw,
            NestedClassRaw, ParamPtrRaw, ParamRaw, PropertyMapRaw, PropertyPtrRaw, PropertyRaw,
            StandAloneSigRaw, TableId, TableInfo, TableInfoRef, TableRow, TypeDefRaw, TypeRefRaw,
            TypeSpecRaw,
        },
        token::Token,
    },
    Error::{OutOfBounds, TokenOutOfRange},
    Result,
};

/// Summary information for one present table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    /// The table
    pub table_id: TableId,
    /// Its row count
    pub row_count: u32,
}

/// Parsed `#~` stream with typed access to every present table.
///
/// Table access is reference-based: [`TablesStream::table`] returns a view
/// over the table's slice of the stream, and rows are parsed only when
/// requested.
pub struct TablesStream<'a> {
    /// Major version of the table schema, shall be 2
    pub major_version: u8,
    /// Minor version of the table schema, shall be 0
    pub minor_version: u8,
    /// Bit mask of present tables
    pub valid: u64,
    /// Bit mask of sorted tables
    pub sorted: u64,
    /// Row counts and index widths of all tables
    pub info: TableInfoRef,
    slices: Vec<Option<&'a [u8]>>,
}

fn row_size_of(table_id: TableId, info: &TableInfoRef) -> u32 {
    match table_id {
        TableId::Module => ModuleRaw::row_size(info),
        TableId::TypeRef => TypeRefRaw::row_size(info),
        TableId::TypeDef => TypeDefRaw::row_size(info),
        TableId::FieldPtr => FieldPtrRaw::row_size(info),
        TableId::Field => FieldRaw::row_size(info),
        TableId::MethodPtr => MethodPtrRaw::row_size(info),
        TableId::MethodDef => MethodDefRaw::row_size(info),
        TableId::ParamPtr => ParamPtrRaw::row_size(info),
        TableId::Param => ParamRaw::row_size(info),
        TableId::InterfaceImpl => InterfaceImplRaw::row_size(info),
        TableId::MemberRef => MemberRefRaw::row_size(info),
        TableId::Constant => ConstantRaw::row_size(info),
        TableId::CustomAttribute => CustomAttributeRaw::row_size(info),
        TableId::FieldMarshal => FieldMarshalRaw::row_size(info),
        TableId::DeclSecurity => DeclSecurityRaw::row_size(info),
        TableId::ClassLayout => ClassLayoutRaw::row_size(info),
        TableId::FieldLayout => FieldLayoutRaw::row_size(info),
        TableId::StandAloneSig => StandAloneSigRaw::row_size(info),
        TableId::EventMap => EventMapRaw::row_size(info),
        TableId::EventPtr => EventPtrRaw::row_size(info),
        TableId::Event => EventRaw::row_size(info),
        TableId::PropertyMap => PropertyMapRaw::row_size(info),
        TableId::PropertyPtr => PropertyPtrRaw::row_size(info),
        TableId::Property => PropertyRaw::row_size(info),
        TableId::MethodSemantics => MethodSemanticsRaw::row_size(info),
        TableId::MethodImpl => MethodImplRaw::row_size(info),
        TableId::ModuleRef => ModuleRefRaw::row_size(info),
        TableId::TypeSpec => TypeSpecRaw::row_size(info),
        TableId::ImplMap => ImplMapRaw::row_size(info),
        TableId::FieldRVA => FieldRvaRaw::row_size(info),
        TableId::Assembly => AssemblyRaw::row_size(info),
        TableId::AssemblyProcessor => AssemblyProcessorRaw::row_size(info),
        TableId::AssemblyOS => AssemblyOsRaw::row_size(info),
        TableId::AssemblyRef => AssemblyRefRaw::row_size(info),
        TableId::AssemblyRefProcessor => AssemblyRefProcessorRaw::row_size(info),
        TableId::AssemblyRefOS => AssemblyRefOsRaw::row_size(info),
        TableId::File => FileRaw::row_size(info),
        TableId::ExportedType => ExportedTypeRaw::row_size(info),
        TableId::ManifestResource => ManifestResourceRaw::row_size(info),
        TableId::NestedClass => NestedClassRaw::row_size(info),
        TableId::GenericParam => GenericParamRaw::row_size(info),
        TableId::MethodSpec => MethodSpecRaw::row_size(info),
        TableId::GenericParamConstraint => GenericParamConstraintRaw::row_size(info),
    }
}

impl<'a> TablesStream<'a> {
    /// Parse a `#~` stream.
    ///
    /// ## Arguments
    /// * 'data' - The stream bytes, starting at the header
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for header inconsistencies (no
    /// present tables, zero row counts, unknown table bits) and
    /// [`OutOfBounds`] when the declared rows cross the stream end
    pub fn from(data: &'a [u8]) -> Result<TablesStream<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid = read_le::<u64>(&data[8..])?;
        if valid == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let info = Arc::new(TableInfo::new(data, valid)?);
        let mut slices: Vec<Option<&'a [u8]>> =
            vec![None; TableId::GenericParamConstraint as usize + 1];

        let mut offset = (24 + valid.count_ones() * 4) as usize;
        for table_id in TableId::iter() {
            let rows = info.get(table_id).rows;
            if rows == 0 {
                continue;
            }

            let size = row_size_of(table_id, &info) as usize * rows as usize;
            let Some(end) = offset.checked_add(size) else {
                return Err(OutOfBounds);
            };
            if end > data.len() {
                return Err(OutOfBounds);
            }

            slices[table_id as usize] = Some(&data[offset..end]);
            offset = end;
        }

        Ok(TablesStream {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            slices,
        })
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Check if a specific table is present
    ///
    /// ## Arguments
    /// * `table_id` - The table to check
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        (self.valid & (1u64 << (table_id as u8))) != 0
    }

    /// Row count of a table (0 when absent)
    ///
    /// ## Arguments
    /// * `table_id` - The table to query
    #[must_use]
    pub fn table_row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Iterator over all present tables
    pub fn present_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        TableId::iter().filter(|table_id| self.has_table(*table_id))
    }

    /// Summary of all present tables with their row counts
    #[must_use]
    pub fn table_summary(&self) -> Vec<TableSummary> {
        self.present_tables()
            .map(|table_id| TableSummary {
                table_id,
                row_count: self.table_row_count(table_id),
            })
            .collect()
    }

    /// Typed view over table `T`, `None` when the table is absent.
    ///
    /// The target table is selected by the row type: `table::<TypeDefRaw>()`
    /// always views the `TypeDef` table, so mismatches between row type and
    /// table cannot arise.
    #[must_use]
    pub fn table<T: TableRow>(&self) -> Option<MetadataTable<'a, T>> {
        let slice = self.slices[T::TABLE_ID as usize]?;
        MetadataTable::new(slice, self.info.get(T::TABLE_ID).rows, self.info.clone()).ok()
    }

    /// Decode the half-open run of owner RID `owner_rid` in a list-owning
    /// table.
    ///
    /// The run starts at the owner's first-of-run column and ends at the
    /// next owner's column, or one past the target table for the last
    /// owner. Inconsistent run columns yield the empty range.
    fn list_range<O, C>(&self, owner_rid: u32, target: TableId, start_col: C) -> Result<MetadataRange>
    where
        O: TableRow,
        C: Fn(&O) -> u32,
    {
        let Some(owners) = self.table::<O>() else {
            return Err(TokenOutOfRange(Token::from_table(O::TABLE_ID, owner_rid)));
        };

        let owner_count = owners.row_count();
        if owner_rid == 0 || owner_rid > owner_count {
            return Err(TokenOutOfRange(Token::from_table(O::TABLE_ID, owner_rid)));
        }

        let target_rows = self.info.get(target).rows;
        let start = start_col(&owners.row(owner_rid)?);
        let end = if owner_rid == owner_count {
            target_rows + 1
        } else {
            start_col(&owners.row(owner_rid + 1)?)
        };

        Ok(MetadataRange::new(target, start, end, target_rows))
    }

    /// The field run of a type
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for an invalid owner RID
    pub fn field_range(&self, type_rid: u32) -> Result<MetadataRange> {
        self.list_range::<TypeDefRaw, _>(type_rid, TableId::Field, |row| row.field_list)
    }

    /// The method run of a type
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for an invalid owner RID
    pub fn method_range(&self, type_rid: u32) -> Result<MetadataRange> {
        self.list_range::<TypeDefRaw, _>(type_rid, TableId::MethodDef, |row| row.method_list)
    }

    /// The parameter run of a method
    ///
    /// ## Arguments
    /// * `method_rid` - RID in the `MethodDef` table
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for an invalid owner RID
    pub fn parameter_range(&self, method_rid: u32) -> Result<MetadataRange> {
        self.list_range::<MethodDefRaw, _>(method_rid, TableId::Param, |row| row.param_list)
    }

    /// The property run of a `PropertyMap` row
    ///
    /// ## Arguments
    /// * `map_rid` - RID in the `PropertyMap` table
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for an invalid owner RID
    pub fn property_range(&self, map_rid: u32) -> Result<MetadataRange> {
        self.list_range::<PropertyMapRaw, _>(map_rid, TableId::Property, |row| row.property_list)
    }

    /// The event run of an `EventMap` row
    ///
    /// ## Arguments
    /// * `map_rid` - RID in the `EventMap` table
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for an invalid owner RID
    pub fn event_range(&self, map_rid: u32) -> Result<MetadataRange> {
        self.list_range::<EventMapRaw, _>(map_rid, TableId::Event, |row| row.event_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal `#~` stream: TypeDef with 3 rows whose field runs
    /// are `[1, 1, 5]` over a Field table of 6 rows.
    fn crafted_stream() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes()); // reserved
        data.push(2); // major
        data.push(0); // minor
        data.push(0); // heap_sizes
        data.push(1); // reserved
        data.extend_from_slice(&((1u64 << 0x02) | (1u64 << 0x04)).to_le_bytes()); // valid
        data.extend_from_slice(&0u64.to_le_bytes()); // sorted
        data.extend_from_slice(&3u32.to_le_bytes()); // TypeDef rows
        data.extend_from_slice(&6u32.to_le_bytes()); // Field rows

        // TypeDef rows: flags u32, name u16, namespace u16, extends u16,
        // field_list u16, method_list u16
        for (index, field_list) in [1u16, 1, 5].iter().enumerate() {
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&(index as u16 + 1).to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
            data.extend_from_slice(&field_list.to_le_bytes());
            data.extend_from_slice(&1u16.to_le_bytes());
        }

        // Field rows: flags u16, name u16, signature u16
        for _ in 0..6 {
            data.extend_from_slice(&[0u8; 6]);
        }

        data
    }

    #[test]
    fn header_and_tables() {
        let data = crafted_stream();
        let stream = TablesStream::from(&data).unwrap();

        assert_eq!(stream.major_version, 2);
        assert_eq!(stream.table_count(), 2);
        assert!(stream.has_table(TableId::TypeDef));
        assert!(stream.has_table(TableId::Field));
        assert!(!stream.has_table(TableId::MethodDef));
        assert_eq!(stream.table_row_count(TableId::TypeDef), 3);
        assert_eq!(stream.table_row_count(TableId::Field), 6);

        let summary = stream.table_summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].table_id, TableId::TypeDef);
        assert_eq!(summary[0].row_count, 3);

        let typedefs = stream.table::<TypeDefRaw>().unwrap();
        assert_eq!(typedefs.row_count(), 3);
        assert_eq!(typedefs.row(2).unwrap().type_name, 2);
        assert!(stream.table::<MethodDefRaw>().is_none());
    }

    #[test]
    fn field_runs() {
        let data = crafted_stream();
        let stream = TablesStream::from(&data).unwrap();

        // FieldList [1, 1, 5] over 6 fields: [1,1), [1,5), [5,7)
        let range_1 = stream.field_range(1).unwrap();
        assert!(range_1.is_empty());

        let range_2 = stream.field_range(2).unwrap();
        assert_eq!((range_2.start(), range_2.end()), (1, 5));

        let range_3 = stream.field_range(3).unwrap();
        assert_eq!((range_3.start(), range_3.end()), (5, 7));

        assert!(matches!(stream.field_range(0), Err(TokenOutOfRange(_))));
        assert!(matches!(stream.field_range(4), Err(TokenOutOfRange(_))));
    }

    #[test]
    fn truncated_stream() {
        let mut data = crafted_stream();
        data.truncate(data.len() - 4);
        assert!(TablesStream::from(&data).is_err());

        assert!(TablesStream::from(&[0u8; 10]).is_err());
    }

    #[test]
    fn no_valid_tables() {
        let mut data = vec![0u8; 24];
        data[4] = 2;
        assert!(TablesStream::from(&data).is_err());
    }
}
