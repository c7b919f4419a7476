use crate::{
    metadata::{
        ranges::MetadataRange,
        signatures::TypeSignature,
        streams::Strings,
        tables::{TypeDefRaw, TypeRefRaw},
        token::Token,
    },
    Result,
};

/// A type defined in another module or assembly (`TypeRef` row).
#[derive(Debug, Clone)]
pub struct TypeReference {
    /// The defining token
    pub token: Token,
    /// Namespace the type lives in (empty for the global namespace)
    pub namespace: String,
    /// Simple name of the type
    pub name: String,
    /// Token of the resolution scope (module, module ref, assembly ref or
    /// enclosing type ref), `None` when nil
    pub resolution_scope: Option<Token>,
}

impl TypeReference {
    /// Build a `TypeReference` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw `TypeRef` row
    /// * `strings` - The #Strings heap
    ///
    /// # Errors
    /// Returns heap access errors for invalid name indexes
    pub fn from_row(row: &TypeRefRaw, strings: &Strings) -> Result<TypeReference> {
        Ok(TypeReference {
            token: row.token,
            namespace: strings.get_or_empty(row.type_namespace as usize)?.to_string(),
            name: strings.get_or_empty(row.type_name as usize)?.to_string(),
            resolution_scope: row.resolution_scope.as_token(),
        })
    }

    /// The namespace-qualified name (`Namespace.Name`)
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// A type defined in the current module (`TypeDef` row).
///
/// Owned members and related types are referenced by [`MetadataRange`] and
/// [`Token`]; resolving them goes back through the module facade, which
/// keeps the member graph acyclic.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    /// The defining token
    pub token: Token,
    /// `TypeAttributes` bit mask
    pub flags: u32,
    /// Namespace the type lives in (empty for the global namespace)
    pub namespace: String,
    /// Simple name of the type
    pub name: String,
    /// Token of the base type, `None` for interfaces and `<Module>`
    pub extends: Option<Token>,
    /// The type's run in the Field table
    pub fields: MetadataRange,
    /// The type's run in the `MethodDef` table
    pub methods: MetadataRange,
    /// The type's run in the Property table (empty without a map row)
    pub properties: MetadataRange,
    /// The type's run in the Event table (empty without a map row)
    pub events: MetadataRange,
    /// Token of the enclosing type, for nested types
    pub enclosing_type: Option<Token>,
    /// Tokens of the types nested inside this one
    pub nested_types: Vec<Token>,
}

impl TypeDefinition {
    /// Build a `TypeDefinition` from its raw row and precomputed
    /// relations.
    ///
    /// ## Arguments
    /// * `row`        - The raw `TypeDef` row
    /// * `strings`    - The #Strings heap
    /// * `fields`     - The type's field run
    /// * `methods`    - The type's method run
    /// * `properties` - The type's property run
    /// * `events`     - The type's event run
    /// * `enclosing`  - Enclosing type token from the nested-class tree
    /// * `nested`     - Nested type tokens from the nested-class tree
    ///
    /// # Errors
    /// Returns heap access errors for invalid name indexes
    #[allow(clippy::too_many_arguments)]
    pub fn from_row(
        row: &TypeDefRaw,
        strings: &Strings,
        fields: MetadataRange,
        methods: MetadataRange,
        properties: MetadataRange,
        events: MetadataRange,
        enclosing: Option<Token>,
        nested: Vec<Token>,
    ) -> Result<TypeDefinition> {
        Ok(TypeDefinition {
            token: row.token,
            flags: row.flags,
            namespace: strings.get_or_empty(row.type_namespace as usize)?.to_string(),
            name: strings.get_or_empty(row.type_name as usize)?.to_string(),
            extends: row.extends.as_token(),
            fields,
            methods,
            properties,
            events,
            enclosing_type: enclosing,
            nested_types: nested,
        })
    }

    /// The namespace-qualified name (`Namespace.Name`)
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// True when the type is nested inside another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing_type.is_some()
    }
}

/// A signature-described type (`TypeSpec` row) with its expanded
/// signature.
#[derive(Debug, Clone)]
pub struct TypeSpecification {
    /// The defining token
    pub token: Token,
    /// The decoded type signature
    pub signature: TypeSignature,
}
