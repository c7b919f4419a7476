//! Fixed-shape row definitions and access machinery for the metadata
//! tables.
//!
//! Each table of ECMA-335 II.22 has a raw row type (`*Raw`) describing its
//! on-disk shape; column widths vary per image and are computed once into a
//! [`TableInfo`]. [`MetadataTable`] provides typed, 1-based row access over
//! a table's byte slice, and [`CodedIndex`] handles the tagged cross-table
//! reference encoding.

mod codedindex;
mod id;
mod info;
mod table;

pub use codedindex::{CodedIndex, CodedIndexEncoder, CodedIndexType};
pub use id::TableId;
pub use info::{TableInfo, TableInfoRef, TableRowInfo};
pub use table::{MetadataTable, TableIterator};

mod assembly;
mod assemblyos;
mod assemblyprocessor;
mod assemblyref;
mod assemblyrefos;
mod assemblyrefprocessor;
mod classlayout;
mod constant;
mod customattribute;
mod declsecurity;
mod event;
mod eventmap;
mod eventptr;
mod exportedtype;
mod field;
mod fieldlayout;
mod fieldmarshal;
mod fieldptr;
mod fieldrva;
mod file;
mod genericparam;
mod genericparamconstraint;
mod implmap;
mod interfaceimpl;
mod manifestresource;
mod memberref;
mod methoddef;
mod methodimpl;
mod methodptr;
mod methodsemantics;
mod methodspec;
mod module;
mod moduleref;
mod nestedclass;
mod param;
mod paramptr;
mod property;
mod propertymap;
mod propertyptr;
mod standalonesig;
mod typedef;
mod typeref;
mod typespec;

pub use assembly::AssemblyRaw;
pub use assemblyos::AssemblyOsRaw;
pub use assemblyprocessor::AssemblyProcessorRaw;
pub use assemblyref::AssemblyRefRaw;
pub use assemblyrefos::AssemblyRefOsRaw;
pub use assemblyrefprocessor::AssemblyRefProcessorRaw;
pub use classlayout::ClassLayoutRaw;
pub use constant::ConstantRaw;
pub use customattribute::CustomAttributeRaw;
pub use declsecurity::DeclSecurityRaw;
pub use event::EventRaw;
pub use eventmap::EventMapRaw;
pub use eventptr::EventPtrRaw;
pub use exportedtype::ExportedTypeRaw;
pub use field::{FieldAttributes, FieldRaw};
pub use fieldlayout::FieldLayoutRaw;
pub use fieldmarshal::FieldMarshalRaw;
pub use fieldptr::FieldPtrRaw;
pub use fieldrva::FieldRvaRaw;
pub use file::FileRaw;
pub use genericparam::GenericParamRaw;
pub use genericparamconstraint::GenericParamConstraintRaw;
pub use implmap::ImplMapRaw;
pub use interfaceimpl::InterfaceImplRaw;
pub use manifestresource::ManifestResourceRaw;
pub use memberref::MemberRefRaw;
pub use methoddef::MethodDefRaw;
pub use methodimpl::MethodImplRaw;
pub use methodptr::MethodPtrRaw;
pub use methodsemantics::MethodSemanticsRaw;
pub use methodspec::MethodSpecRaw;
pub use module::ModuleRaw;
pub use moduleref::ModuleRefRaw;
pub use nestedclass::NestedClassRaw;
pub use param::ParamRaw;
pub use paramptr::ParamPtrRaw;
pub use property::PropertyRaw;
pub use propertymap::PropertyMapRaw;
pub use propertyptr::PropertyPtrRaw;
pub use standalonesig::StandAloneSigRaw;
pub use typedef::{TypeAttributes, TypeDefRaw};
pub use typeref::TypeRefRaw;
pub use typespec::TypeSpecRaw;

use crate::Result;

/// Interface implemented by every raw table row type.
///
/// `row_size` computes the byte width of one row from the image's table and
/// heap sizes; `read_row` parses one row and advances the offset. RIDs are
/// 1-based as everywhere at the format boundary.
pub trait TableRow: Sized + Send {
    /// The table this row type belongs to
    const TABLE_ID: TableId;

    /// Byte size of a single row in an image with the given sizes
    ///
    /// ## Arguments
    /// * `sizes` - Table size information of the containing image
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Parse a single row.
    ///
    /// ## Arguments
    /// * `data`   - Buffer holding the table, starting at its first row
    /// * `offset` - Read position, advanced by the bytes consumed
    /// * `rid`    - The 1-based row identifier of this row
    /// * `sizes`  - Table size information for variable-width columns
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncation and
    /// [`crate::Error::InvalidCodedIndex`] for malformed coded columns
    fn read_row(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}
