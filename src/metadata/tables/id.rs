use strum::{EnumCount, EnumIter, FromRepr};

/// Identifier of a metadata table as defined in ECMA-335 II.22.
///
/// The discriminant equals the table's bit position in the `valid` mask of
/// the tables stream header and the high byte of tokens referencing it.
/// The gaps at 0x1E/0x1F are unassigned by the standard.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, EnumIter, EnumCount, FromRepr)]
#[repr(usize)]
pub enum TableId {
    /// Current module descriptor (one row)
    Module = 0x00,
    /// References to types defined in other modules
    TypeRef = 0x01,
    /// Types defined in the current module
    TypeDef = 0x02,
    /// Field indirection table (edit-and-continue images)
    FieldPtr = 0x03,
    /// Fields of types
    Field = 0x04,
    /// Method indirection table (edit-and-continue images)
    MethodPtr = 0x05,
    /// Methods of types
    MethodDef = 0x06,
    /// Parameter indirection table (edit-and-continue images)
    ParamPtr = 0x07,
    /// Parameters of methods
    Param = 0x08,
    /// Interface implementations of types
    InterfaceImpl = 0x09,
    /// References to members of other types
    MemberRef = 0x0A,
    /// Compile-time constant values
    Constant = 0x0B,
    /// Custom attribute attachments
    CustomAttribute = 0x0C,
    /// Marshalling descriptors for fields and parameters
    FieldMarshal = 0x0D,
    /// Declarative security attachments
    DeclSecurity = 0x0E,
    /// Explicit class layout information
    ClassLayout = 0x0F,
    /// Explicit field offsets
    FieldLayout = 0x10,
    /// Standalone signatures (locals, indirect calls)
    StandAloneSig = 0x11,
    /// Type → event-run association
    EventMap = 0x12,
    /// Event indirection table (edit-and-continue images)
    EventPtr = 0x13,
    /// Events of types
    Event = 0x14,
    /// Type → property-run association
    PropertyMap = 0x15,
    /// Property indirection table (edit-and-continue images)
    PropertyPtr = 0x16,
    /// Properties of types
    Property = 0x17,
    /// Links between semantic methods and events/properties
    MethodSemantics = 0x18,
    /// Method implementation overrides
    MethodImpl = 0x19,
    /// References to other modules of this assembly
    ModuleRef = 0x1A,
    /// Type specifications (signature-described types)
    TypeSpec = 0x1B,
    /// P/Invoke mappings
    ImplMap = 0x1C,
    /// Initial field data locations
    FieldRVA = 0x1D,
    /// Current assembly descriptor
    Assembly = 0x20,
    /// Deprecated processor table for the current assembly
    AssemblyProcessor = 0x21,
    /// Deprecated OS table for the current assembly
    AssemblyOS = 0x22,
    /// References to external assemblies
    AssemblyRef = 0x23,
    /// Deprecated processor table for assembly references
    AssemblyRefProcessor = 0x24,
    /// Deprecated OS table for assembly references
    AssemblyRefOS = 0x25,
    /// Files of the assembly manifest
    File = 0x26,
    /// Types exported from other modules of this assembly
    ExportedType = 0x27,
    /// Manifest resources
    ManifestResource = 0x28,
    /// Parent links for nested types
    NestedClass = 0x29,
    /// Generic parameters of types and methods
    GenericParam = 0x2A,
    /// Generic method instantiations
    MethodSpec = 0x2B,
    /// Constraints on generic parameters
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Resolve a token's table byte to a `TableId`, if it names a table
    /// this crate models.
    #[must_use]
    pub fn from_token_table(table: u8) -> Option<TableId> {
        TableId::from_repr(table as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount as _, IntoEnumIterator};

    #[test]
    fn discriminants_match_token_bytes() {
        assert_eq!(TableId::Module as usize, 0x00);
        assert_eq!(TableId::TypeDef as usize, 0x02);
        assert_eq!(TableId::MethodDef as usize, 0x06);
        assert_eq!(TableId::FieldRVA as usize, 0x1D);
        assert_eq!(TableId::Assembly as usize, 0x20);
        assert_eq!(TableId::GenericParamConstraint as usize, 0x2C);
    }

    #[test]
    fn iteration_skips_gaps() {
        let all: Vec<TableId> = TableId::iter().collect();
        assert_eq!(all.len(), TableId::COUNT);
        assert!(!all.iter().any(|id| *id as usize == 0x1E));
        assert!(!all.iter().any(|id| *id as usize == 0x1F));
        // iteration is in discriminant order
        assert!(all.windows(2).all(|w| (w[0] as usize) < (w[1] as usize)));
    }

    #[test]
    fn from_token_table() {
        assert_eq!(TableId::from_token_table(0x02), Some(TableId::TypeDef));
        assert_eq!(TableId::from_token_table(0x1E), None);
        assert_eq!(TableId::from_token_table(0x70), None);
    }
}
