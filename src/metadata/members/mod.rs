//! Resolved member objects and the identity caches behind token lookup.
//!
//! Members are the high-level view of table rows: names resolved through
//! the heaps, signatures decoded from their blobs, ownership expressed as
//! [`crate::metadata::ranges::MetadataRange`] runs. Members reference each
//! other exclusively by [`crate::metadata::token::Token`], never by
//! pointer, so the graph stays acyclic and cacheable.

mod assembly;
mod field;
mod memberref;
mod method;
mod property;
mod types;

pub use assembly::{AssemblyReference, AssemblyVersion, ModuleReference};
pub use field::FieldDefinition;
pub use memberref::{MemberRefSignature, MemberReference};
pub use method::{MethodDefinition, ParamDefinition};
pub use property::{EventDefinition, PropertyDefinition};
pub use types::{TypeDefinition, TypeReference, TypeSpecification};

use std::sync::Arc;

use dashmap::DashMap;

use crate::metadata::token::Token;

/// Shared reference to a [`TypeReference`]
pub type TypeRefRc = Arc<TypeReference>;
/// Shared reference to a [`TypeDefinition`]
pub type TypeDefRc = Arc<TypeDefinition>;
/// Shared reference to a [`TypeSpecification`]
pub type TypeSpecRc = Arc<TypeSpecification>;
/// Shared reference to a [`FieldDefinition`]
pub type FieldRc = Arc<FieldDefinition>;
/// Shared reference to a [`MethodDefinition`]
pub type MethodRc = Arc<MethodDefinition>;
/// Shared reference to a [`ParamDefinition`]
pub type ParamRc = Arc<ParamDefinition>;
/// Shared reference to a [`MemberReference`]
pub type MemberRefRc = Arc<MemberReference>;
/// Shared reference to a [`ModuleReference`]
pub type ModuleRefRc = Arc<ModuleReference>;
/// Shared reference to an [`AssemblyReference`]
pub type AssemblyRefRc = Arc<AssemblyReference>;
/// Shared reference to a [`PropertyDefinition`]
pub type PropertyRc = Arc<PropertyDefinition>;
/// Shared reference to an [`EventDefinition`]
pub type EventRc = Arc<EventDefinition>;

/// Any member a metadata token can resolve to.
#[derive(Debug, Clone)]
pub enum Member {
    /// A `TypeRef` row
    TypeReference(TypeRefRc),
    /// A `TypeDef` row
    TypeDefinition(TypeDefRc),
    /// A `TypeSpec` row
    TypeSpecification(TypeSpecRc),
    /// A Field row
    FieldDefinition(FieldRc),
    /// A `MethodDef` row
    MethodDefinition(MethodRc),
    /// A Param row
    ParamDefinition(ParamRc),
    /// A `MemberRef` row
    MemberReference(MemberRefRc),
    /// A `ModuleRef` row
    ModuleReference(ModuleRefRc),
    /// An `AssemblyRef` row
    AssemblyReference(AssemblyRefRc),
    /// A Property row
    PropertyDefinition(PropertyRc),
    /// An Event row
    EventDefinition(EventRc),
}

impl Member {
    /// The defining token of the member
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Member::TypeReference(member) => member.token,
            Member::TypeDefinition(member) => member.token,
            Member::TypeSpecification(member) => member.token,
            Member::FieldDefinition(member) => member.token,
            Member::MethodDefinition(member) => member.token,
            Member::ParamDefinition(member) => member.token,
            Member::MemberReference(member) => member.token,
            Member::ModuleReference(member) => member.token,
            Member::AssemblyReference(member) => member.token,
            Member::PropertyDefinition(member) => member.token,
            Member::EventDefinition(member) => member.token,
        }
    }

    /// The member's simple name, where it has one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::TypeReference(member) => Some(&member.name),
            Member::TypeDefinition(member) => Some(&member.name),
            Member::TypeSpecification(_) => None,
            Member::FieldDefinition(member) => Some(&member.name),
            Member::MethodDefinition(member) => Some(&member.name),
            Member::ParamDefinition(member) => Some(&member.name),
            Member::MemberReference(member) => Some(&member.name),
            Member::ModuleReference(member) => Some(&member.name),
            Member::AssemblyReference(member) => Some(&member.name),
            Member::PropertyDefinition(member) => Some(&member.name),
            Member::EventDefinition(member) => Some(&member.name),
        }
    }
}

/// Per-table identity caches of the member factory.
///
/// Each map is keyed by RID. Lookups follow compute-then-publish: a miss
/// constructs the member outside any map lock, then installs it with
/// `entry().or_insert()`, so racing constructors agree on one winner and
/// every later lookup returns that same [`Arc`].
#[derive(Default)]
pub(crate) struct MemberCache {
    pub type_refs: DashMap<u32, TypeRefRc>,
    pub type_defs: DashMap<u32, TypeDefRc>,
    pub type_specs: DashMap<u32, TypeSpecRc>,
    pub fields: DashMap<u32, FieldRc>,
    pub methods: DashMap<u32, MethodRc>,
    pub params: DashMap<u32, ParamRc>,
    pub member_refs: DashMap<u32, MemberRefRc>,
    pub module_refs: DashMap<u32, ModuleRefRc>,
    pub assembly_refs: DashMap<u32, AssemblyRefRc>,
    pub properties: DashMap<u32, PropertyRc>,
    pub events: DashMap<u32, EventRc>,
}

impl MemberCache {
    pub(crate) fn new() -> Self {
        MemberCache::default()
    }
}
