//! The module facade: token lookup over a parsed metadata root.
//!
//! [`Module`] owns the raw metadata buffer and the stream views borrowed
//! from it in one self-referencing value, then resolves tokens into cached
//! member objects on demand. All caches publish compute-then-install, so a
//! token resolved twice returns the same [`std::sync::Arc`] and concurrent
//! readers are safe without external locking.

use std::sync::{Arc, OnceLock};

use ouroboros::self_referencing;
use rustc_hash::FxHashMap;

use crate::{
    metadata::{
        elements::{read_element, ElementScope, ElementValue},
        members::{
            AssemblyRefRc, AssemblyReference, EventRc, EventDefinition, FieldDefinition, FieldRc,
            Member, MemberCache, MemberRefRc, MemberReference, MethodDefinition, MethodRc,
            ModuleRefRc, ModuleReference, ParamDefinition, ParamRc, PropertyDefinition,
            PropertyRc, TypeDefRc, TypeDefinition, TypeRefRc, TypeReference, TypeSpecRc,
            TypeSpecification,
        },
        ranges::{MemberRangeMap, MetadataRange},
        signatures::{RecursionProtection, SignatureParser, TypeSignature},
        streams::{Blob, GuidHeap, Root, Strings, TablesStream, UserStrings},
        tables::{
            AssemblyRaw, AssemblyRefRaw, CodedIndexEncoder, CodedIndexType, EventMapRaw, EventRaw,
            FieldAttributes, FieldRaw, MemberRefRaw, MethodDefRaw, ModuleRaw, ModuleRefRaw,
            NestedClassRaw, ParamRaw, PropertyMapRaw, PropertyRaw, TableId, TypeDefRaw,
            TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
    },
    Error::{MemberResolution, TokenOutOfRange},
    Result,
};

/// Table byte of user-string tokens (`ldstr` operands)
const STRING_TOKEN_TABLE: u8 = 0x70;

/// Assembly names recognized as the core library
const KNOWN_CORLIB_NAMES: &[&str] = &[
    "mscorlib",
    "System.Runtime",
    "System.Private.CoreLib",
    "netstandard",
];

/// The core library a module compiles against.
#[derive(Debug, Clone)]
pub enum Corlib {
    /// The most recent known-named assembly reference
    External(AssemblyRefRc),
    /// The current assembly itself is the core library
    Current,
}

struct NestedTree {
    /// nested `TypeDef` RID → enclosing `TypeDef` RID
    enclosing: FxHashMap<u32, u32>,
    /// enclosing `TypeDef` RID → nested `TypeDef` RIDs, in table order
    nested: FxHashMap<u32, Vec<u32>>,
}

/// Stream views and caches borrowed from the module's buffer.
pub struct ModuleData<'a> {
    root: Root,
    tables: TablesStream<'a>,
    strings: Option<Strings<'a>>,
    userstrings: Option<UserStrings<'a>>,
    guids: Option<GuidHeap<'a>>,
    blobs: Option<Blob<'a>>,
    cache: MemberCache,
    nested: OnceLock<NestedTree>,
    field_owners: MemberRangeMap,
    method_owners: MemberRangeMap,
    param_owners: MemberRangeMap,
    property_owners: MemberRangeMap,
    event_owners: MemberRangeMap,
}

impl<'a> ModuleData<'a> {
    fn from_root(data: &'a [u8]) -> Result<ModuleData<'a>> {
        let root = Root::read(data)?;

        let mut tables = None;
        let mut strings = None;
        let mut userstrings = None;
        let mut guids = None;
        let mut blobs = None;

        for header in &root.stream_headers {
            let stream_data = &data[header.offset as usize..(header.offset + header.size) as usize];

            match header.name.as_str() {
                "#~" => tables = Some(TablesStream::from(stream_data)?),
                "#-" => return Err(crate::Error::NotSupported),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#US" => userstrings = Some(UserStrings::from(stream_data)?),
                "#GUID" => guids = Some(GuidHeap::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                _ => {}
            }
        }

        let Some(tables) = tables else {
            return Err(malformed_error!("Metadata root carries no #~ stream"));
        };

        Ok(ModuleData {
            root,
            tables,
            strings,
            userstrings,
            guids,
            blobs,
            cache: MemberCache::new(),
            nested: OnceLock::new(),
            field_owners: MemberRangeMap::new(TableId::Field),
            method_owners: MemberRangeMap::new(TableId::MethodDef),
            param_owners: MemberRangeMap::new(TableId::Param),
            property_owners: MemberRangeMap::new(TableId::Property),
            event_owners: MemberRangeMap::new(TableId::Event),
        })
    }

    fn strings(&self) -> Result<&Strings<'a>> {
        self.strings
            .as_ref()
            .ok_or_else(|| malformed_error!("Metadata root carries no #Strings heap"))
    }

    fn blobs(&self) -> Result<&Blob<'a>> {
        self.blobs
            .as_ref()
            .ok_or_else(|| malformed_error!("Metadata root carries no #Blob heap"))
    }

    fn table<T: crate::metadata::tables::TableRow>(
        &self,
    ) -> Result<crate::metadata::tables::MetadataTable<'a, T>> {
        self.tables.table::<T>().ok_or_else(|| {
            malformed_error!("Referenced table {:?} is not present", T::TABLE_ID)
        })
    }

    fn nested_tree(&self) -> &NestedTree {
        if let Some(tree) = self.nested.get() {
            return tree;
        }

        let mut enclosing = FxHashMap::default();
        let mut nested: FxHashMap<u32, Vec<u32>> = FxHashMap::default();

        if let Some(classes) = self.tables.table::<NestedClassRaw>() {
            for row in classes.iter() {
                enclosing.insert(row.nested_class, row.enclosing_class);
                nested
                    .entry(row.enclosing_class)
                    .or_default()
                    .push(row.nested_class);
            }
        }

        self.nested.get_or_init(|| NestedTree { enclosing, nested })
    }

    fn fields_of(&self, type_rid: u32) -> Result<MetadataRange> {
        let rows = self.tables.table_row_count(TableId::TypeDef);
        self.field_owners
            .range_of(type_rid, rows, Ok, |rid| self.tables.field_range(rid))
    }

    fn methods_of(&self, type_rid: u32) -> Result<MetadataRange> {
        let rows = self.tables.table_row_count(TableId::TypeDef);
        self.method_owners
            .range_of(type_rid, rows, Ok, |rid| self.tables.method_range(rid))
    }

    fn params_of(&self, method_rid: u32) -> Result<MetadataRange> {
        let rows = self.tables.table_row_count(TableId::MethodDef);
        self.param_owners
            .range_of(method_rid, rows, Ok, |rid| self.tables.parameter_range(rid))
    }

    fn properties_of(&self, type_rid: u32) -> Result<MetadataRange> {
        let rows = self.tables.table_row_count(TableId::PropertyMap);
        self.property_owners.range_of(
            type_rid,
            rows,
            |map_rid| Ok(self.table::<PropertyMapRaw>()?.row(map_rid)?.parent),
            |map_rid| self.tables.property_range(map_rid),
        )
    }

    fn events_of(&self, type_rid: u32) -> Result<MetadataRange> {
        let rows = self.tables.table_row_count(TableId::EventMap);
        self.event_owners.range_of(
            type_rid,
            rows,
            |map_rid| Ok(self.table::<EventMapRaw>()?.row(map_rid)?.parent),
            |map_rid| self.tables.event_range(map_rid),
        )
    }

    fn field_owner(&self, field_rid: u32) -> Result<u32> {
        let rows = self.tables.table_row_count(TableId::TypeDef);
        self.field_owners
            .owner_of(field_rid, rows, Ok, |rid| self.tables.field_range(rid))
    }

    fn method_owner(&self, method_rid: u32) -> Result<u32> {
        let rows = self.tables.table_row_count(TableId::TypeDef);
        self.method_owners
            .owner_of(method_rid, rows, Ok, |rid| self.tables.method_range(rid))
    }

    fn param_owner(&self, param_rid: u32) -> Result<u32> {
        let rows = self.tables.table_row_count(TableId::MethodDef);
        self.param_owners
            .owner_of(param_rid, rows, Ok, |rid| self.tables.parameter_range(rid))
    }

    fn property_owner(&self, property_rid: u32) -> Result<u32> {
        let rows = self.tables.table_row_count(TableId::PropertyMap);
        self.property_owners.owner_of(
            property_rid,
            rows,
            |map_rid| Ok(self.table::<PropertyMapRaw>()?.row(map_rid)?.parent),
            |map_rid| self.tables.property_range(map_rid),
        )
    }

    fn event_owner(&self, event_rid: u32) -> Result<u32> {
        let rows = self.tables.table_row_count(TableId::EventMap);
        self.event_owners.owner_of(
            event_rid,
            rows,
            |map_rid| Ok(self.table::<EventMapRaw>()?.row(map_rid)?.parent),
            |map_rid| self.tables.event_range(map_rid),
        )
    }

    fn type_ref(&self, rid: u32) -> Result<TypeRefRc> {
        if let Some(existing) = self.cache.type_refs.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<TypeRefRaw>()?.row(rid)?;
        let member = Arc::new(TypeReference::from_row(&row, self.strings()?)?);
        Ok(self.cache.type_refs.entry(rid).or_insert(member).clone())
    }

    fn type_def(&self, rid: u32) -> Result<TypeDefRc> {
        if let Some(existing) = self.cache.type_defs.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<TypeDefRaw>()?.row(rid)?;
        let tree = self.nested_tree();
        let enclosing = tree
            .enclosing
            .get(&rid)
            .map(|parent| Token::from_table(TableId::TypeDef, *parent));
        let nested = tree
            .nested
            .get(&rid)
            .map(|children| {
                children
                    .iter()
                    .map(|child| Token::from_table(TableId::TypeDef, *child))
                    .collect()
            })
            .unwrap_or_default();

        let member = Arc::new(TypeDefinition::from_row(
            &row,
            self.strings()?,
            self.fields_of(rid)?,
            self.methods_of(rid)?,
            self.properties_of(rid)?,
            self.events_of(rid)?,
            enclosing,
            nested,
        )?);
        Ok(self.cache.type_defs.entry(rid).or_insert(member).clone())
    }

    fn type_spec(&self, rid: u32) -> Result<TypeSpecRc> {
        if let Some(existing) = self.cache.type_specs.get(&rid) {
            return Ok(existing.clone());
        }

        let token = Token::from_table(TableId::TypeSpec, rid);
        let mut guard = RecursionProtection::new();
        let signature = self.expand_spec(token, &mut guard)?;

        let member = Arc::new(TypeSpecification { token, signature });
        Ok(self.cache.type_specs.entry(rid).or_insert(member).clone())
    }

    fn field(&self, rid: u32) -> Result<FieldRc> {
        if let Some(existing) = self.cache.fields.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<FieldRaw>()?.row(rid)?;
        let member = Arc::new(FieldDefinition::from_row(
            &row,
            self.strings()?,
            self.blobs()?,
        )?);
        Ok(self.cache.fields.entry(rid).or_insert(member).clone())
    }

    fn method(&self, rid: u32) -> Result<MethodRc> {
        if let Some(existing) = self.cache.methods.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<MethodDefRaw>()?.row(rid)?;
        let member = Arc::new(MethodDefinition::from_row(
            &row,
            self.strings()?,
            self.blobs()?,
            self.params_of(rid)?,
        )?);
        Ok(self.cache.methods.entry(rid).or_insert(member).clone())
    }

    fn param(&self, rid: u32) -> Result<ParamRc> {
        if let Some(existing) = self.cache.params.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<ParamRaw>()?.row(rid)?;
        let member = Arc::new(ParamDefinition::from_row(&row, self.strings()?)?);
        Ok(self.cache.params.entry(rid).or_insert(member).clone())
    }

    fn member_ref(&self, rid: u32) -> Result<MemberRefRc> {
        if let Some(existing) = self.cache.member_refs.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<MemberRefRaw>()?.row(rid)?;
        let member = Arc::new(MemberReference::from_row(
            &row,
            self.strings()?,
            self.blobs()?,
        )?);
        Ok(self.cache.member_refs.entry(rid).or_insert(member).clone())
    }

    fn module_ref(&self, rid: u32) -> Result<ModuleRefRc> {
        if let Some(existing) = self.cache.module_refs.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<ModuleRefRaw>()?.row(rid)?;
        let member = Arc::new(ModuleReference::from_row(&row, self.strings()?)?);
        Ok(self.cache.module_refs.entry(rid).or_insert(member).clone())
    }

    fn assembly_ref(&self, rid: u32) -> Result<AssemblyRefRc> {
        if let Some(existing) = self.cache.assembly_refs.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<AssemblyRefRaw>()?.row(rid)?;
        let member = Arc::new(AssemblyReference::from_row(
            &row,
            self.strings()?,
            self.blobs()?,
        )?);
        Ok(self.cache.assembly_refs.entry(rid).or_insert(member).clone())
    }

    fn property(&self, rid: u32) -> Result<PropertyRc> {
        if let Some(existing) = self.cache.properties.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<PropertyRaw>()?.row(rid)?;
        let member = Arc::new(PropertyDefinition::from_row(
            &row,
            self.strings()?,
            self.blobs()?,
        )?);
        Ok(self.cache.properties.entry(rid).or_insert(member).clone())
    }

    fn event(&self, rid: u32) -> Result<EventRc> {
        if let Some(existing) = self.cache.events.get(&rid) {
            return Ok(existing.clone());
        }

        let row = self.table::<EventRaw>()?.row(rid)?;
        let member = Arc::new(EventDefinition::from_row(&row, self.strings()?)?);
        Ok(self.cache.events.entry(rid).or_insert(member).clone())
    }

    fn try_lookup_member(&self, token: Token) -> Result<Option<Member>> {
        if token.is_nil() {
            return Ok(None);
        }

        let Some(table_id) = TableId::from_token_table(token.table()) else {
            return Ok(None);
        };

        let rid = token.rid();
        if rid > self.tables.table_row_count(table_id) {
            return Err(TokenOutOfRange(token));
        }

        Ok(Some(match table_id {
            TableId::TypeRef => Member::TypeReference(self.type_ref(rid)?),
            TableId::TypeDef => Member::TypeDefinition(self.type_def(rid)?),
            TableId::TypeSpec => Member::TypeSpecification(self.type_spec(rid)?),
            TableId::Field => Member::FieldDefinition(self.field(rid)?),
            TableId::MethodDef => Member::MethodDefinition(self.method(rid)?),
            TableId::Param => Member::ParamDefinition(self.param(rid)?),
            TableId::MemberRef => Member::MemberReference(self.member_ref(rid)?),
            TableId::ModuleRef => Member::ModuleReference(self.module_ref(rid)?),
            TableId::AssemblyRef => Member::AssemblyReference(self.assembly_ref(rid)?),
            TableId::Property => Member::PropertyDefinition(self.property(rid)?),
            TableId::Event => Member::EventDefinition(self.event(rid)?),
            _ => return Ok(None),
        }))
    }

    fn try_lookup_string(&self, token: Token) -> Result<Option<String>> {
        if token.table() != STRING_TOKEN_TABLE || token.rid() == 0 {
            return Ok(None);
        }

        let Some(userstrings) = self.userstrings.as_ref() else {
            return Ok(None);
        };

        match userstrings.get(token.rid() as usize)? {
            Some(value) => match value.to_string() {
                Ok(decoded) => Ok(Some(decoded)),
                Err(_) => Err(malformed_error!(
                    "User string {} is not valid UTF-16",
                    token
                )),
            },
            None => Ok(None),
        }
    }

    fn module_row(&self) -> Result<ModuleRaw> {
        self.table::<ModuleRaw>()?.row(1)
    }

    fn assembly_row(&self) -> Option<AssemblyRaw> {
        self.tables.table::<AssemblyRaw>()?.get(1)
    }

    fn assembly_references(&self) -> Result<Vec<AssemblyRefRc>> {
        let Some(refs) = self.tables.table::<AssemblyRefRaw>() else {
            return Ok(Vec::new());
        };

        (1..=refs.row_count())
            .map(|rid| self.assembly_ref(rid))
            .collect()
    }

    fn corlib(&self) -> Result<Option<Corlib>> {
        let mut best: Option<AssemblyRefRc> = None;
        for reference in self.assembly_references()? {
            if !KNOWN_CORLIB_NAMES.contains(&reference.name.as_str()) {
                continue;
            }

            match &best {
                Some(current) if current.version >= reference.version => {}
                _ => best = Some(reference),
            }
        }

        if let Some(reference) = best {
            return Ok(Some(Corlib::External(reference)));
        }

        if let Some(assembly) = self.assembly_row() {
            let name = self.strings()?.get_or_empty(assembly.name as usize)?;
            if KNOWN_CORLIB_NAMES.contains(&name) {
                return Ok(Some(Corlib::Current));
            }
        }

        Ok(None)
    }

    fn top_level_types(&self) -> Result<Vec<TypeDefRc>> {
        let Some(type_defs) = self.tables.table::<TypeDefRaw>() else {
            return Ok(Vec::new());
        };

        let tree = self.nested_tree();
        (1..=type_defs.row_count())
            .filter(|rid| !tree.enclosing.contains_key(rid))
            .map(|rid| self.type_def(rid))
            .collect()
    }
}

impl ElementScope for ModuleData<'_> {
    fn type_name(&self, token: Token) -> Result<String> {
        match TableId::from_token_table(token.table()) {
            Some(TableId::TypeDef) => Ok(self.type_def(token.rid())?.full_name()),
            Some(TableId::TypeRef) => Ok(self.type_ref(token.rid())?.full_name()),
            _ => Err(MemberResolution(token)),
        }
    }

    fn expand_spec(&self, token: Token, guard: &mut RecursionProtection) -> Result<TypeSignature> {
        guard.enter(token)?;
        let result = (|| {
            let row = self.table::<TypeSpecRaw>()?.row(token.rid())?;
            let blob = self
                .blobs()?
                .get(row.signature as usize)?
                .ok_or(MemberResolution(token))?;
            let spec = SignatureParser::new(blob).parse_type_spec_signature()?;

            // collapse TypeSpec→TypeSpec chains under the same guard
            match spec.base {
                TypeSignature::Class(inner) | TypeSignature::ValueType(inner)
                    if inner.table() == TableId::TypeSpec as u8 =>
                {
                    self.expand_spec(inner, guard)
                }
                base => Ok(base),
            }
        })();
        guard.leave(token);
        result
    }

    fn enum_underlying(
        &self,
        token: Token,
        _guard: &mut RecursionProtection,
    ) -> Result<Option<TypeSignature>> {
        if token.table() != TableId::TypeDef as u8 {
            // external types cannot be inspected within a single module
            return Ok(None);
        }

        let type_def = self.type_def(token.rid())?;
        let Some(extends) = type_def.extends else {
            return Ok(None);
        };
        if extends.table() == TableId::TypeSpec as u8 {
            return Ok(None);
        }
        if self.type_name(extends)? != "System.Enum" {
            return Ok(None);
        }

        for field_token in type_def.fields.tokens() {
            let field = self.field(field_token.rid())?;
            if field.flags & FieldAttributes::STATIC == 0 {
                return Ok(Some(field.signature.base.clone()));
            }
        }

        // enums without a visible instance field default to int32
        Ok(Some(TypeSignature::I4))
    }
}

#[self_referencing]
/// A loaded metadata module: the top-level entry point for token lookup.
///
/// The module owns its metadata buffer; heaps, tables and all cached
/// members borrow from it and live exactly as long as the module. Layout
/// is immutable after construction, member and range caches fill lazily.
pub struct Module {
    buffer: Vec<u8>,

    #[borrows(buffer)]
    #[not_covariant]
    data: ModuleData<'this>,
}

impl Module {
    /// Load a module from a raw metadata root (`BSJB` blob).
    ///
    /// The buffer is exactly what a PE loader finds at the CLI header's
    /// metadata directory; locating it inside a PE file is the caller's
    /// concern.
    ///
    /// ## Arguments
    /// * `data` - The metadata root bytes, starting at the signature
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for structural inconsistencies
    /// and [`crate::Error::NotSupported`] for `#-` stream images
    pub fn from_metadata(data: Vec<u8>) -> Result<Self> {
        Module::try_new(data, |buffer| ModuleData::from_root(buffer))
    }

    /// The runtime version string of the metadata root
    #[must_use]
    pub fn runtime_version(&self) -> String {
        self.with_data(|data| data.root.version.clone())
    }

    /// The module name from the Module table
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the Module table or
    /// #Strings heap is missing
    pub fn name(&self) -> Result<String> {
        self.with_data(|data| {
            let row = data.module_row()?;
            Ok(data.strings()?.get_or_empty(row.name as usize)?.to_string())
        })
    }

    /// The module version identifier GUID
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the Module table or #GUID
    /// heap is missing
    pub fn mvid(&self) -> Result<Option<uguid::Guid>> {
        self.with_data(|data| {
            let row = data.module_row()?;
            match data.guids.as_ref() {
                Some(guids) => guids.get(row.mvid as usize),
                None => Ok(None),
            }
        })
    }

    /// The edit-and-continue identifier GUID
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the Module table is missing
    pub fn enc_id(&self) -> Result<Option<uguid::Guid>> {
        self.with_data(|data| {
            let row = data.module_row()?;
            match data.guids.as_ref() {
                Some(guids) => guids.get(row.enc_id as usize),
                None => Ok(None),
            }
        })
    }

    /// The edit-and-continue base identifier GUID
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the Module table is missing
    pub fn enc_base_id(&self) -> Result<Option<uguid::Guid>> {
        self.with_data(|data| {
            let row = data.module_row()?;
            match data.guids.as_ref() {
                Some(guids) => guids.get(row.enc_base_id as usize),
                None => Ok(None),
            }
        })
    }

    /// Resolve a token to its member, `Ok(None)` for nil tokens and tokens
    /// of tables without a member object.
    ///
    /// ## Arguments
    /// * `token` - The token to resolve
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] when the RID exceeds the table, and
    /// construction errors for malformed rows
    pub fn try_lookup_member(&self, token: Token) -> Result<Option<Member>> {
        self.with_data(|data| data.try_lookup_member(token))
    }

    /// Resolve a token to its member.
    ///
    /// ## Arguments
    /// * `token` - The token to resolve
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] for nil, unknown-table and out-of-range
    /// tokens, and construction errors for malformed rows
    pub fn lookup_member(&self, token: Token) -> Result<Member> {
        match self.try_lookup_member(token)? {
            Some(member) => Ok(member),
            None => Err(TokenOutOfRange(token)),
        }
    }

    /// Resolve a user-string token (table byte 0x70) against the #US heap,
    /// `Ok(None)` for nil tokens.
    ///
    /// ## Arguments
    /// * `token` - The string token to resolve
    ///
    /// # Errors
    /// Returns heap access errors for invalid offsets
    pub fn try_lookup_string(&self, token: Token) -> Result<Option<String>> {
        self.with_data(|data| data.try_lookup_string(token))
    }

    /// Resolve a user-string token.
    ///
    /// ## Arguments
    /// * `token` - The string token to resolve
    ///
    /// # Errors
    /// Returns [`TokenOutOfRange`] when the token does not resolve
    pub fn lookup_string(&self, token: Token) -> Result<String> {
        match self.try_lookup_string(token)? {
            Some(value) => Ok(value),
            None => Err(TokenOutOfRange(token)),
        }
    }

    /// An encoder/decoder for one coded index category, using this image's
    /// table sizes.
    ///
    /// ## Arguments
    /// * `kind` - The coded index category
    #[must_use]
    pub fn index_encoder(&self, kind: CodedIndexType) -> CodedIndexEncoder {
        self.with_data(|data| CodedIndexEncoder::new(data.tables.info.clone(), kind))
    }

    /// All types not nested inside another type, in table order.
    ///
    /// # Errors
    /// Returns construction errors for malformed type rows
    pub fn top_level_types(&self) -> Result<Vec<TypeDefRc>> {
        self.with_data(|data| data.top_level_types())
    }

    /// All assembly references, in table order.
    ///
    /// # Errors
    /// Returns construction errors for malformed reference rows
    pub fn assembly_references(&self) -> Result<Vec<AssemblyRefRc>> {
        self.with_data(|data| data.assembly_references())
    }

    /// The core library this module compiles against: the most recent
    /// known-named assembly reference, or the current assembly when its
    /// own name is a known core library name.
    ///
    /// # Errors
    /// Returns construction errors for malformed reference rows
    pub fn corlib(&self) -> Result<Option<Corlib>> {
        self.with_data(|data| data.corlib())
    }

    /// The field run of a type
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn fields_of(&self, type_rid: u32) -> Result<MetadataRange> {
        self.with_data(|data| data.fields_of(type_rid))
    }

    /// The method run of a type
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn methods_of(&self, type_rid: u32) -> Result<MetadataRange> {
        self.with_data(|data| data.methods_of(type_rid))
    }

    /// The parameter run of a method
    ///
    /// ## Arguments
    /// * `method_rid` - RID in the `MethodDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn params_of(&self, method_rid: u32) -> Result<MetadataRange> {
        self.with_data(|data| data.params_of(method_rid))
    }

    /// The property run of a type (empty without a `PropertyMap` row)
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn properties_of(&self, type_rid: u32) -> Result<MetadataRange> {
        self.with_data(|data| data.properties_of(type_rid))
    }

    /// The event run of a type (empty without an `EventMap` row)
    ///
    /// ## Arguments
    /// * `type_rid` - RID in the `TypeDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn events_of(&self, type_rid: u32) -> Result<MetadataRange> {
        self.with_data(|data| data.events_of(type_rid))
    }

    /// The type owning a field, 0 when no type claims it
    ///
    /// ## Arguments
    /// * `field_rid` - RID in the Field table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn field_owner(&self, field_rid: u32) -> Result<u32> {
        self.with_data(|data| data.field_owner(field_rid))
    }

    /// The type owning a method, 0 when no type claims it
    ///
    /// ## Arguments
    /// * `method_rid` - RID in the `MethodDef` table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn method_owner(&self, method_rid: u32) -> Result<u32> {
        self.with_data(|data| data.method_owner(method_rid))
    }

    /// The method owning a parameter, 0 when no method claims it
    ///
    /// ## Arguments
    /// * `param_rid` - RID in the Param table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn param_owner(&self, param_rid: u32) -> Result<u32> {
        self.with_data(|data| data.param_owner(param_rid))
    }

    /// The type owning a property, 0 when no type claims it
    ///
    /// ## Arguments
    /// * `property_rid` - RID in the Property table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn property_owner(&self, property_rid: u32) -> Result<u32> {
        self.with_data(|data| data.property_owner(property_rid))
    }

    /// The type owning an event, 0 when no type claims it
    ///
    /// ## Arguments
    /// * `event_rid` - RID in the Event table
    ///
    /// # Errors
    /// Returns row access errors from the populating walk
    pub fn event_owner(&self, event_rid: u32) -> Result<u32> {
        self.with_data(|data| data.event_owner(event_rid))
    }

    /// Expand a `TypeSpec` token into its type signature, with protection
    /// against cyclic `TypeSpec` chains.
    ///
    /// ## Arguments
    /// * `token` - The `TypeSpec` token to expand
    ///
    /// # Errors
    /// Returns [`crate::Error::SignatureRecursion`] for cyclic expansion
    pub fn type_spec_signature(&self, token: Token) -> Result<TypeSignature> {
        self.with_data(|data| {
            let mut guard = RecursionProtection::new();
            data.expand_spec(token, &mut guard)
        })
    }

    /// Decode one custom-attribute element value described by `atom`.
    ///
    /// ## Arguments
    /// * `data` - The element's wire bytes
    /// * `atom` - The type signature describing the element
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedElement`] for element types
    /// outside the attribute grammar and [`MemberResolution`] when a type
    /// reference cannot be resolved
    pub fn read_element(&self, data: &[u8], atom: &TypeSignature) -> Result<ElementValue> {
        self.with_data(|module_data| {
            let mut parser = crate::Parser::new(data);
            let mut guard = RecursionProtection::new();
            read_element(&mut parser, atom, module_data, &mut guard)
        })
    }

    /// Row counts of all present tables
    #[must_use]
    pub fn table_row_count(&self, table_id: TableId) -> u32 {
        self.with_data(|data| data.tables.table_row_count(table_id))
    }
}
