//! Store population and the frozen metadata store.
//!
//! Population is a single-threaded batch: a `StoreBuilder` collects type
//! shells and their members, then `build()` validates the batch, reconciles
//! member lists, and compiles one dispatch table per type. The resulting
//! `MetadataStore` is immutable and can be shared across reader threads
//! without locking.
//!
//! Any population error poisons the builder: later registrations are
//! ignored and `build()` returns the first error. A store is either built
//! from a fully consistent batch or not at all.

use crate::descriptor::{
    FieldDescriptor, MemberDescriptor, MethodDescriptor, PropertyDescriptor, TypeDescriptor,
    TypeLink,
};
use crate::dispatch::DispatchTable;
use crate::error::PopulationError;
use crate::handle::{FieldHandle, Handle, MethodHandle, PropertyHandle, TypeHandle};
use crate::manifest::Manifest;
use crate::registry::{
    FieldRegistry, MemberRegistry, MethodRegistry, PropertyRegistry, Registration, TypeRegistry,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::any::{Any, TypeId as HostTypeId};
use tracing::{debug, trace, warn};
use typestore_common::{DescriptorKey, FieldKey, MethodKey, PropertyKey, TypeKey};

// =============================================================================
// Options
// =============================================================================

/// Validation knobs for `StoreBuilder::build`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reject key references to types that were never registered.
    ///
    /// Off by default: forward references are tolerated and resolve to the
    /// zero-value descriptor if they are never satisfied.
    pub strict_type_references: bool,

    /// Accept members whose owning type was never registered.
    pub allow_orphan_members: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict_type_references: false,
            allow_orphan_members: true,
        }
    }
}

impl BuildOptions {
    /// Every reference must resolve and every member must have an owner.
    pub const fn strict() -> Self {
        Self {
            strict_type_references: true,
            allow_orphan_members: false,
        }
    }
}

/// Compiled name dispatch for one type.
#[derive(Clone, Debug, Default)]
pub struct MemberDispatch {
    pub fields: DispatchTable<FieldKey>,
    pub properties: DispatchTable<PropertyKey>,
    pub methods: DispatchTable<MethodKey>,
}

// =============================================================================
// StoreBuilder
// =============================================================================

/// Single-threaded population phase.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    options: BuildOptions,
    types: TypeRegistry,
    fields: FieldRegistry,
    properties: PropertyRegistry,
    methods: MethodRegistry,
    host_types: FxHashMap<HostTypeId, (TypeKey, &'static str)>,
    poisoned: Option<PopulationError>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// The first population error, if any.
    pub fn error(&self) -> Option<&PopulationError> {
        self.poisoned.as_ref()
    }

    /// Register a type shell. Register it before its members so eager
    /// consumers see a consistent shell; lazy resolution does not care.
    pub fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<TypeKey, PopulationError> {
        self.check_poisoned()?;
        let key = descriptor.key;
        let outcome = self.types.register(descriptor);
        match self.record(outcome)? {
            Registration::DisplacedName(previous) => {
                debug!(
                    type_key = %key,
                    previous = %previous,
                    "type name now resolves to the newer registration"
                );
            }
            Registration::Inserted | Registration::Overwritten => {}
        }
        Ok(key)
    }

    pub fn register_field(
        &mut self,
        owner: TypeKey,
        descriptor: FieldDescriptor,
    ) -> Result<FieldKey, PopulationError> {
        self.check_poisoned()?;
        let outcome = register_member(&mut self.fields, owner, descriptor);
        self.record(outcome)
    }

    pub fn register_property(
        &mut self,
        owner: TypeKey,
        descriptor: PropertyDescriptor,
    ) -> Result<PropertyKey, PopulationError> {
        self.check_poisoned()?;
        let outcome = register_member(&mut self.properties, owner, descriptor);
        self.record(outcome)
    }

    pub fn register_method(
        &mut self,
        owner: TypeKey,
        descriptor: MethodDescriptor,
    ) -> Result<MethodKey, PopulationError> {
        self.check_poisoned()?;
        let outcome = register_member(&mut self.methods, owner, descriptor);
        self.record(outcome)
    }

    /// Associate the Rust type `T` with a registered type key, so that
    /// `MetadataStore::type_of` can answer for values of `T`.
    pub fn bind_host_type<T: Any + ?Sized>(&mut self, key: TypeKey) -> &mut Self {
        trace!(
            host = std::any::type_name::<T>(),
            type_key = %key,
            "StoreBuilder::bind_host_type"
        );
        self.host_types
            .insert(HostTypeId::of::<T>(), (key, std::any::type_name::<T>()));
        self
    }

    /// Register everything in a manifest (metadata only, no accessors).
    pub fn load_manifest(&mut self, manifest: &Manifest) -> Result<(), PopulationError> {
        manifest.populate(self)
    }

    /// Validate the batch and freeze it into a `MetadataStore`.
    pub fn build(mut self) -> Result<MetadataStore, PopulationError> {
        if let Some(err) = self.poisoned.take() {
            return Err(err);
        }

        reconcile_members(&mut self.types, &self.fields, &self.options)?;
        reconcile_members(&mut self.types, &self.properties, &self.options)?;
        reconcile_members(&mut self.types, &self.methods, &self.options)?;
        check_type_references(&self)?;

        let mut owners: FxHashSet<TypeKey> = self.types.keys().collect();
        owners.extend(self.fields.owners());
        owners.extend(self.properties.owners());
        owners.extend(self.methods.owners());

        let mut dispatch = FxHashMap::default();
        let mut hashed_names = 0usize;
        for owner in owners {
            let tables = MemberDispatch {
                fields: DispatchTable::build(self.fields.names_for_type(owner)),
                properties: DispatchTable::build(self.properties.names_for_type(owner)),
                methods: DispatchTable::build(self.methods.names_for_type(owner)),
            };
            hashed_names += tables.fields.stats().hashed_names
                + tables.properties.stats().hashed_names
                + tables.methods.stats().hashed_names;
            dispatch.insert(owner, tables);
        }

        debug!(
            types = self.types.len(),
            fields = self.fields.len(),
            properties = self.properties.len(),
            methods = self.methods.len(),
            hashed_names,
            "StoreBuilder::build - store frozen"
        );

        Ok(MetadataStore {
            types: self.types,
            fields: self.fields,
            properties: self.properties,
            methods: self.methods,
            dispatch,
            host_types: self
                .host_types
                .into_iter()
                .map(|(id, (key, _))| (id, key))
                .collect(),
        })
    }

    fn check_poisoned(&self) -> Result<(), PopulationError> {
        match &self.poisoned {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record<T>(&mut self, outcome: Result<T, PopulationError>) -> Result<T, PopulationError> {
        if let Err(err) = &outcome {
            warn!(error = %err, "population aborted");
            self.poisoned.get_or_insert_with(|| err.clone());
        }
        outcome
    }
}

fn register_member<D: MemberDescriptor>(
    registry: &mut MemberRegistry<D>,
    owner: TypeKey,
    descriptor: D,
) -> Result<D::Key, PopulationError> {
    let key = descriptor.key();
    match registry.register(descriptor, owner)? {
        Registration::DisplacedName(existing) => Err(PopulationError::MemberNameCollision {
            kind: D::KIND,
            owner,
            name: registry.get(key).descriptor_name().to_string(),
            existing: existing.raw(),
            incoming: key.raw(),
        }),
        Registration::Inserted | Registration::Overwritten => Ok(key),
    }
}

/// Make each type's declared key list agree with the member registry.
///
/// Declared keys must belong to the declaring type. Registered members a
/// type did not declare are appended in registration order, and duplicate
/// declarations collapse to the first.
fn reconcile_members<D: MemberDescriptor>(
    types: &mut TypeRegistry,
    members: &MemberRegistry<D>,
    options: &BuildOptions,
) -> Result<(), PopulationError> {
    let mut registered_by_owner: FxHashMap<TypeKey, Vec<D::Key>> = FxHashMap::default();
    for (owner, descriptor) in members.iter() {
        if !types.contains(owner) {
            if !options.allow_orphan_members {
                return Err(PopulationError::OrphanMember {
                    kind: D::KIND,
                    key: descriptor.key().raw(),
                    owner,
                });
            }
            warn!(
                kind = %D::KIND,
                key = %descriptor.key(),
                owner = %owner,
                "member registered to a type that was never registered"
            );
            continue;
        }
        registered_by_owner
            .entry(owner)
            .or_default()
            .push(descriptor.key());
    }

    let type_keys: Vec<TypeKey> = types.keys().collect();
    for type_key in type_keys {
        let Some(ty) = types.get_mut(type_key) else {
            continue;
        };
        let declared = D::declared_keys_mut(ty);

        let mut seen: FxHashSet<D::Key> = FxHashSet::default();
        declared.retain(|key| seen.insert(*key));

        for key in declared.iter() {
            match members.owner_of(*key) {
                Some(owner) if owner != type_key => {
                    return Err(PopulationError::ForeignMember {
                        kind: D::KIND,
                        key: key.raw(),
                        declared_by: type_key,
                        owned_by: owner,
                    });
                }
                Some(_) => {}
                None if options.strict_type_references => {
                    return Err(PopulationError::DanglingReference {
                        from: type_key.to_string(),
                        target: key.to_string(),
                    });
                }
                None => {
                    debug!(
                        type_key = %type_key,
                        member = %key,
                        "declared member never registered; resolves to zero value"
                    );
                }
            }
        }

        if let Some(registered) = registered_by_owner.remove(&type_key) {
            for key in registered {
                if seen.insert(key) {
                    declared.push(key);
                }
            }
        }
    }
    Ok(())
}

/// Strict mode: every keyed type reference must be registered.
fn check_type_references(builder: &StoreBuilder) -> Result<(), PopulationError> {
    let types = &builder.types;
    let mut dangling = 0usize;
    let mut check = |from: String, link: &TypeLink| -> Result<(), PopulationError> {
        let target = link.type_key();
        if target.is_valid() && !types.contains(target) {
            if builder.options.strict_type_references {
                return Err(PopulationError::DanglingReference {
                    from,
                    target: target.to_string(),
                });
            }
            dangling += 1;
        }
        Ok(())
    };

    for ty in types.iter() {
        for link in ty.type_links() {
            check(ty.key.to_string(), link)?;
        }
    }
    for (_, field) in builder.fields.iter() {
        for link in field.type_links() {
            check(field.key.to_string(), link)?;
        }
    }
    for (_, property) in builder.properties.iter() {
        for link in property.type_links() {
            check(property.key.to_string(), link)?;
        }
    }
    for (_, method) in builder.methods.iter() {
        for link in method.type_links() {
            check(method.key.to_string(), link)?;
        }
    }
    for (key, host) in builder.host_types.values() {
        check(format!("host type {host}"), &TypeLink::Key(*key))?;
    }

    if dangling > 0 {
        debug!(dangling, "unresolved type references left for lazy resolution");
    }
    Ok(())
}

// =============================================================================
// MetadataStore
// =============================================================================

/// Immutable, populated descriptor store.
///
/// All queries are total: unknown keys give the zero-value descriptor,
/// unknown names give `None`.
#[derive(Debug, Default)]
pub struct MetadataStore {
    types: TypeRegistry,
    fields: FieldRegistry,
    properties: PropertyRegistry,
    methods: MethodRegistry,
    dispatch: FxHashMap<TypeKey, MemberDispatch>,
    host_types: FxHashMap<HostTypeId, TypeKey>,
}

impl MetadataStore {
    /// Start a population batch.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// A store with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get a type by key; the zero-value descriptor for unknown keys.
    pub fn get_type(&self, key: TypeKey) -> TypeHandle<'_> {
        Handle::borrowed(self, self.types.get(key))
    }

    /// Look a type up by full or simple name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeHandle<'_>> {
        self.types
            .get_by_name(name)
            .map(|descriptor| Handle::borrowed(self, descriptor))
    }

    /// Descriptor for the static type of `value`.
    pub fn type_of<T: Any + ?Sized>(&self, _value: &T) -> TypeHandle<'_> {
        self.type_of_type::<T>()
    }

    /// Descriptor for the Rust type `T`.
    ///
    /// Types bound with `StoreBuilder::bind_host_type` resolve to their
    /// registered descriptor; anything else gets a name-only fallback.
    pub fn type_of_type<T: Any + ?Sized>(&self) -> TypeHandle<'_> {
        match self.host_types.get(&HostTypeId::of::<T>()) {
            Some(key) => self.get_type(*key),
            None => {
                let full = std::any::type_name::<T>();
                trace!(host = full, "MetadataStore::type_of - name-only fallback");
                Handle::owned(self, TypeDescriptor::for_host_type(full))
            }
        }
    }

    /// Snapshot of every registered type, in registration order.
    pub fn all_types(&self) -> Vec<TypeHandle<'_>> {
        self.types
            .iter()
            .map(|descriptor| Handle::borrowed(self, descriptor))
            .collect()
    }

    pub fn get_field(&self, key: FieldKey) -> FieldHandle<'_> {
        Handle::borrowed(self, self.fields.get(key))
    }

    pub fn get_property(&self, key: PropertyKey) -> PropertyHandle<'_> {
        Handle::borrowed(self, self.properties.get(key))
    }

    pub fn get_method(&self, key: MethodKey) -> MethodHandle<'_> {
        Handle::borrowed(self, self.methods.get(key))
    }

    /// Resolve a field of `owner` by name through the dispatch table.
    pub fn field_by_name(&self, owner: TypeKey, name: &str) -> Option<FieldHandle<'_>> {
        let key = self.dispatch.get(&owner)?.fields.resolve(name)?;
        self.fields
            .try_get(key)
            .map(|descriptor| Handle::borrowed(self, descriptor))
    }

    pub fn property_by_name(&self, owner: TypeKey, name: &str) -> Option<PropertyHandle<'_>> {
        let key = self.dispatch.get(&owner)?.properties.resolve(name)?;
        self.properties
            .try_get(key)
            .map(|descriptor| Handle::borrowed(self, descriptor))
    }

    pub fn method_by_name(&self, owner: TypeKey, name: &str) -> Option<MethodHandle<'_>> {
        let key = self.dispatch.get(&owner)?.methods.resolve(name)?;
        self.methods
            .try_get(key)
            .map(|descriptor| Handle::borrowed(self, descriptor))
    }

    /// The compiled dispatch tables for `owner`.
    pub fn dispatch(&self, owner: TypeKey) -> Option<&MemberDispatch> {
        self.dispatch.get(&owner)
    }

    /// Follow a type link.
    ///
    /// Keyed links resolve through the registry (zero value if the key was
    /// never registered); name-only links synthesize a fallback descriptor.
    pub fn resolve_link(&self, link: &TypeLink) -> TypeHandle<'_> {
        match link {
            TypeLink::Key(key) => self.get_type(*key),
            TypeLink::Named(named) => Handle::owned(self, TypeDescriptor::from_named(named)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
