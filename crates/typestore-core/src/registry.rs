//! Descriptor registries.
//!
//! One registry per entity kind, each mapping a key to its descriptor. The
//! member registries additionally keep a per-owner `name -> key` index.
//!
//! Registries are write-once, read-many: they are filled during population
//! (`&mut self`) and only read afterwards (`&self`), so the read path needs
//! no synchronization.
//!
//! ## Lookup contract
//!
//! | Operation | Unknown input |
//! |-----------|---------------|
//! | `get(key)` | zero-value descriptor (`key == 0`) |
//! | `get_by_name(owner, name)` | `None` |
//! | `all_for_type(owner)` | empty snapshot |

use crate::descriptor::{Descriptor, MemberDescriptor, TypeDescriptor};
use crate::descriptor::{FieldDescriptor, MethodDescriptor, PropertyDescriptor};
use crate::error::{EntityKind, PopulationError};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::Arc;
use tracing::trace;
use typestore_common::limits::MAX_MEMBER_NAME_LEN;
use typestore_common::{DescriptorKey, TypeKey};

/// Outcome of a successful registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Registration<K> {
    /// New key.
    Inserted,
    /// Same key registered again with the same shape; descriptor replaced.
    Overwritten,
    /// New key whose name was already indexed under another key. The index
    /// now points at the new key (last write wins).
    DisplacedName(K),
}

// =============================================================================
// TypeRegistry
// =============================================================================

/// `TypeKey` -> `TypeDescriptor`, plus a name index.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    entries: IndexMap<TypeKey, TypeDescriptor, FxBuildHasher>,
    by_name: FxHashMap<Arc<str>, TypeKey>,
    by_full_name: FxHashMap<Arc<str>, TypeKey>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type descriptor under its own key.
    ///
    /// Rejects the reserved key, types flagged both value and reference, and
    /// underlying types on non-nullable types. Re-registering a key is
    /// allowed only with the same shape; member lists may change.
    pub fn register(
        &mut self,
        descriptor: TypeDescriptor,
    ) -> Result<Registration<TypeKey>, PopulationError> {
        let key = descriptor.key;
        if !key.is_valid() {
            return Err(PopulationError::ReservedKey {
                kind: EntityKind::Type,
                name: descriptor.name.to_string(),
            });
        }
        if descriptor.flags.is_ambiguous() {
            return Err(PopulationError::AmbiguousTypeKind {
                key,
                name: descriptor.name.to_string(),
            });
        }
        if descriptor.underlying_type.is_some() && !descriptor.is_nullable() {
            return Err(PopulationError::UnderlyingWithoutNullable {
                key,
                name: descriptor.name.to_string(),
            });
        }

        let mut outcome = Registration::Inserted;
        if let Some(existing) = self.entries.get(&key) {
            if !existing.same_shape(&descriptor) {
                return Err(PopulationError::ConflictingDescriptor {
                    kind: EntityKind::Type,
                    key: key.raw(),
                    existing: existing.shape_label(),
                    incoming: descriptor.shape_label(),
                });
            }
            outcome = Registration::Overwritten;
        }

        if let Some(previous) = self.by_name.insert(descriptor.name.clone(), key) {
            if previous != key {
                outcome = Registration::DisplacedName(previous);
            }
        }
        self.by_full_name
            .insert(descriptor.full_name.clone(), key);

        trace!(
            type_key = %key,
            name = %descriptor.name,
            flags = ?descriptor.flags,
            outcome = ?outcome,
            "TypeRegistry::register"
        );
        self.entries.insert(key, descriptor);
        Ok(outcome)
    }

    /// Get a type by key; the zero-value descriptor for unknown keys.
    #[inline]
    pub fn get(&self, key: TypeKey) -> &TypeDescriptor {
        self.entries.get(&key).unwrap_or_else(|| TypeDescriptor::zero())
    }

    #[inline]
    pub fn try_get(&self, key: TypeKey) -> Option<&TypeDescriptor> {
        self.entries.get(&key)
    }

    #[inline]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Look a type up by full name, then by simple name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_full_name
            .get(name)
            .or_else(|| self.by_name.get(name))
            .and_then(|key| self.entries.get(key))
    }

    /// Snapshot of every registered type, in registration order.
    pub fn all(&self) -> Vec<TypeDescriptor> {
        self.entries.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_mut(&mut self, key: TypeKey) -> Option<&mut TypeDescriptor> {
        self.entries.get_mut(&key)
    }
}

// =============================================================================
// MemberRegistry
// =============================================================================

#[derive(Clone, Debug)]
struct MemberEntry<D> {
    owner: TypeKey,
    descriptor: D,
}

/// Member key -> descriptor, plus `owner -> (name -> key)`.
#[derive(Clone, Debug)]
pub struct MemberRegistry<D: MemberDescriptor> {
    entries: IndexMap<D::Key, MemberEntry<D>, FxBuildHasher>,
    by_type: FxHashMap<TypeKey, IndexMap<Arc<str>, D::Key, FxBuildHasher>>,
}

pub type FieldRegistry = MemberRegistry<FieldDescriptor>;
pub type PropertyRegistry = MemberRegistry<PropertyDescriptor>;
pub type MethodRegistry = MemberRegistry<MethodDescriptor>;

impl<D: MemberDescriptor> Default for MemberRegistry<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
            by_type: FxHashMap::default(),
        }
    }
}

impl<D: MemberDescriptor> MemberRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member owned by `owner`.
    ///
    /// The name index is last-write-wins; a new key that takes over an
    /// existing name is reported as `Registration::DisplacedName`.
    pub fn register(
        &mut self,
        descriptor: D,
        owner: TypeKey,
    ) -> Result<Registration<D::Key>, PopulationError> {
        let key = descriptor.key();
        let name = descriptor.descriptor_name();
        if !key.is_valid() {
            return Err(PopulationError::ReservedKey {
                kind: D::KIND,
                name: name.to_string(),
            });
        }
        if name.is_empty() || name.len() > MAX_MEMBER_NAME_LEN {
            return Err(PopulationError::InvalidMemberName {
                kind: D::KIND,
                key: key.raw(),
                name: name.to_string(),
            });
        }
        if !owner.is_valid() {
            return Err(PopulationError::OrphanMember {
                kind: D::KIND,
                key: key.raw(),
                owner,
            });
        }

        let mut outcome = Registration::Inserted;
        if let Some(existing) = self.entries.get(&key) {
            if existing.owner != owner || !existing.descriptor.same_shape(&descriptor) {
                return Err(PopulationError::ConflictingDescriptor {
                    kind: D::KIND,
                    key: key.raw(),
                    existing: format!("{}.{}", existing.owner, existing.descriptor.shape_label()),
                    incoming: format!("{owner}.{}", descriptor.shape_label()),
                });
            }
            outcome = Registration::Overwritten;
        }

        let name: Arc<str> = Arc::from(name);
        if let Some(previous) = self
            .by_type
            .entry(owner)
            .or_default()
            .insert(name.clone(), key)
        {
            if previous != key {
                outcome = Registration::DisplacedName(previous);
            }
        }

        trace!(
            kind = %D::KIND,
            key = %key,
            owner = %owner,
            name = %name,
            outcome = ?outcome,
            "MemberRegistry::register"
        );
        self.entries.insert(key, MemberEntry { owner, descriptor });
        Ok(outcome)
    }

    /// Get a member by key; the zero-value descriptor for unknown keys.
    #[inline]
    pub fn get(&self, key: D::Key) -> &D {
        self.entries
            .get(&key)
            .map(|entry| &entry.descriptor)
            .unwrap_or_else(|| D::zero())
    }

    #[inline]
    pub fn try_get(&self, key: D::Key) -> Option<&D> {
        self.entries.get(&key).map(|entry| &entry.descriptor)
    }

    #[inline]
    pub fn contains(&self, key: D::Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// The type a member was registered to.
    pub fn owner_of(&self, key: D::Key) -> Option<TypeKey> {
        self.entries.get(&key).map(|entry| entry.owner)
    }

    /// Look a member up through the owner's name index.
    ///
    /// `None` means "no such member"; it is never a fallback descriptor.
    pub fn get_by_name(&self, owner: TypeKey, name: &str) -> Option<&D> {
        let key = self.by_type.get(&owner)?.get(name)?;
        self.try_get(*key)
    }

    /// Snapshot of the members indexed for `owner`, in registration order.
    ///
    /// The returned vector is independent of the registry.
    pub fn all_for_type(&self, owner: TypeKey) -> Vec<D> {
        self.keys_for_type(owner)
            .into_iter()
            .filter_map(|key| self.try_get(key).cloned())
            .collect()
    }

    /// Keys indexed for `owner`, in registration order.
    pub fn keys_for_type(&self, owner: TypeKey) -> Vec<D::Key> {
        self.by_type
            .get(&owner)
            .map(|index| index.values().copied().collect())
            .unwrap_or_default()
    }

    /// `(name, key)` pairs indexed for `owner`.
    pub fn names_for_type(&self, owner: TypeKey) -> impl Iterator<Item = (&str, D::Key)> {
        self.by_type
            .get(&owner)
            .into_iter()
            .flat_map(|index| index.iter().map(|(name, key)| (name.as_ref(), *key)))
    }

    /// Every type that owns at least one member of this kind.
    pub fn owners(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.by_type.keys().copied()
    }

    /// `(owner, descriptor)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeKey, &D)> {
        self.entries
            .values()
            .map(|entry| (entry.owner, &entry.descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
