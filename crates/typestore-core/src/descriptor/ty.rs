//! Type descriptors.

use super::{Descriptor, NamedType, TypeLink};
use crate::error::EntityKind;
use crate::flags::TypeFlags;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::sync::Arc;
use typestore_common::limits::INLINE_TYPE_ARGS;
use typestore_common::names::{host_name_is_generic, short_host_name};
use typestore_common::{FieldKey, MethodKey, PropertyKey, TypeKey};

static ZERO: Lazy<TypeDescriptor> = Lazy::new(TypeDescriptor::unresolved);

/// Generic argument list; inline for the common one/two-argument case.
pub type TypeArgs = SmallVec<[TypeLink; INLINE_TYPE_ARGS]>;

/// Complete information about a type.
///
/// Member lists hold keys only; the members themselves live in their
/// registries. A descriptor with `key == TypeKey::INVALID` is a name-only
/// fallback: it has a label and flags but no members, and is never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDescriptor {
    pub key: TypeKey,

    /// Simple name (`Person`, `List`1`)
    pub name: Arc<str>,

    /// Namespace-qualified name
    pub full_name: Arc<str>,

    /// Fully qualified name including the defining assembly/crate
    pub assembly_qualified_name: Arc<str>,

    pub flags: TypeFlags,

    /// Declared fields, in declaration order
    pub field_keys: Vec<FieldKey>,

    /// Declared properties, in declaration order
    pub property_keys: Vec<PropertyKey>,

    /// Declared methods, in declaration order
    pub method_keys: Vec<MethodKey>,

    /// The wrapped type; only meaningful when `NULLABLE` is set
    pub underlying_type: Option<TypeLink>,

    /// Type arguments of a constructed generic type
    pub generic_type_arguments: Option<TypeArgs>,
}

impl TypeDescriptor {
    /// Create a descriptor with all three names set to `name`.
    pub fn new(key: TypeKey, name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        Self {
            key,
            full_name: name.clone(),
            assembly_qualified_name: name.clone(),
            name,
            flags: TypeFlags::empty(),
            field_keys: Vec::new(),
            property_keys: Vec::new(),
            method_keys: Vec::new(),
            underlying_type: None,
            generic_type_arguments: None,
        }
    }

    /// The zero-value descriptor.
    pub fn unresolved() -> Self {
        Self::new(TypeKey::INVALID, "")
    }

    /// Name-only fallback for a type known by label alone.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeKey::INVALID, name)
    }

    /// Name-only fallback carrying the flags stored on a link.
    pub fn from_named(named: &NamedType) -> Self {
        Self::named(named.name.clone()).with_flags(named.flags)
    }

    /// Name-only fallback for a Rust type that was never bound to a key.
    pub fn for_host_type(full_type_name: &str) -> Self {
        let flags = if host_name_is_generic(full_type_name) {
            TypeFlags::GENERIC
        } else {
            TypeFlags::empty()
        };
        Self::named(short_host_name(full_type_name))
            .with_full_name(full_type_name)
            .with_assembly_qualified_name(full_type_name)
            .with_flags(flags)
    }

    pub fn with_full_name(mut self, full_name: impl Into<Arc<str>>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_assembly_qualified_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.assembly_qualified_name = name.into();
        self
    }

    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark as a value type.
    pub fn value_type(mut self) -> Self {
        self.flags.insert(TypeFlags::VALUE_TYPE);
        self.flags.remove(TypeFlags::REFERENCE_TYPE);
        self
    }

    /// Mark as a reference type.
    pub fn reference_type(mut self) -> Self {
        self.flags.insert(TypeFlags::REFERENCE_TYPE);
        self.flags.remove(TypeFlags::VALUE_TYPE);
        self
    }

    /// Mark as a constructed generic type with the given arguments.
    pub fn generic<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeLink>,
    {
        self.flags.insert(TypeFlags::GENERIC);
        self.generic_type_arguments = Some(arguments.into_iter().map(Into::into).collect());
        self
    }

    /// Mark as a nullable wrapper around `underlying`.
    pub fn nullable(mut self, underlying: impl Into<TypeLink>) -> Self {
        self.flags.insert(TypeFlags::NULLABLE);
        self.underlying_type = Some(underlying.into());
        self
    }

    pub fn with_fields(mut self, keys: impl IntoIterator<Item = FieldKey>) -> Self {
        self.field_keys = keys.into_iter().collect();
        self
    }

    pub fn with_properties(mut self, keys: impl IntoIterator<Item = PropertyKey>) -> Self {
        self.property_keys = keys.into_iter().collect();
        self
    }

    pub fn with_methods(mut self, keys: impl IntoIterator<Item = MethodKey>) -> Self {
        self.method_keys = keys.into_iter().collect();
        self
    }

    /// Check if this descriptor came from the registry (not a fallback).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.key.is_valid()
    }

    #[inline]
    pub fn is_value_type(&self) -> bool {
        self.flags.contains(TypeFlags::VALUE_TYPE)
    }

    #[inline]
    pub fn is_reference_type(&self) -> bool {
        self.flags.contains(TypeFlags::REFERENCE_TYPE)
    }

    #[inline]
    pub fn is_generic_type(&self) -> bool {
        self.flags.contains(TypeFlags::GENERIC)
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(TypeFlags::NULLABLE)
    }

    /// Key of the underlying type, if it is keyed.
    pub fn underlying_type_key(&self) -> Option<TypeKey> {
        self.underlying_type
            .as_ref()
            .map(TypeLink::type_key)
            .filter(|key| key.is_valid())
    }

    /// Keys of the generic arguments (invalid for name-only arguments).
    pub fn generic_type_argument_keys(&self) -> Option<Vec<TypeKey>> {
        self.generic_type_arguments
            .as_ref()
            .map(|args| args.iter().map(TypeLink::type_key).collect())
    }

    /// Every type link this descriptor holds.
    pub(crate) fn type_links(&self) -> impl Iterator<Item = &TypeLink> {
        self.underlying_type
            .iter()
            .chain(self.generic_type_arguments.iter().flatten())
    }
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl Descriptor for TypeDescriptor {
    type Key = TypeKey;
    const KIND: EntityKind = EntityKind::Type;

    fn key(&self) -> TypeKey {
        self.key
    }

    fn descriptor_name(&self) -> &str {
        &self.name
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.full_name == other.full_name
            && self.flags == other.flags
            && self.underlying_type == other.underlying_type
            && self.generic_type_arguments == other.generic_type_arguments
    }

    fn shape_label(&self) -> String {
        let mut label = format!("{} {:?}", self.full_name, self.flags);
        if let Some(underlying) = &self.underlying_type {
            label.push_str(&format!(" of {underlying}"));
        }
        if let Some(arguments) = &self.generic_type_arguments {
            let arguments: Vec<String> = arguments.iter().map(ToString::to_string).collect();
            label.push_str(&format!("[{}]", arguments.join(", ")));
        }
        label
    }

    fn zero() -> &'static Self {
        &ZERO
    }
}
