//! Field descriptors.

use super::{Descriptor, MemberDescriptor, TypeDescriptor, TypeLink};
use crate::accessor::Accessor;
use crate::error::EntityKind;
use once_cell::sync::Lazy;
use std::any::Any;
use std::sync::Arc;
use typestore_common::{FieldKey, TypeKey};

static ZERO: Lazy<FieldDescriptor> = Lazy::new(FieldDescriptor::unresolved);

/// A field of a type.
///
/// The owning type is not stored here; the field registry keeps the
/// `(owner, name) -> key` index.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub name: Arc<str>,
    pub field_type: TypeLink,
    pub is_read_only: bool,
    pub accessor: Accessor,
}

impl FieldDescriptor {
    /// Create a metadata-only field.
    ///
    /// `field_type` is either a `TypeKey` (resolved through the registry)
    /// or a type name (name-only fallback).
    pub fn new(key: FieldKey, name: impl Into<Arc<str>>, field_type: impl Into<TypeLink>) -> Self {
        Self {
            key,
            name: name.into(),
            field_type: field_type.into(),
            is_read_only: false,
            accessor: Accessor::none(),
        }
    }

    /// The zero-value descriptor.
    pub fn unresolved() -> Self {
        Self::new(FieldKey::INVALID, "", TypeLink::unresolved())
    }

    pub fn read_only(mut self, is_read_only: bool) -> Self {
        self.is_read_only = is_read_only;
        self
    }

    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = accessor;
        self
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.key.is_valid()
    }

    /// `TypeKey::INVALID` when the field type is known by name only.
    pub fn field_type_key(&self) -> TypeKey {
        self.field_type.type_key()
    }

    /// The fallback label when the field type has no descriptor.
    pub fn field_type_name(&self) -> Option<&str> {
        self.field_type.type_name()
    }

    /// Read the field from `instance`. `None` when no getter is bound.
    pub fn get_value(&self, instance: &dyn Any) -> Option<Box<dyn Any + Send>> {
        self.accessor.get(instance)
    }

    /// Read the field and downcast to `V`.
    pub fn get_value_as<V: Any>(&self, instance: &dyn Any) -> Option<V> {
        self.get_value(instance)?.downcast::<V>().ok().map(|value| *value)
    }

    /// Write the field on `instance`. No-op returning `false` when no
    /// setter is bound.
    pub fn set_value<V: Any + Send>(&self, instance: &mut dyn Any, value: V) -> bool {
        self.accessor.set(instance, Box::new(value))
    }

    pub fn set_value_boxed(&self, instance: &mut dyn Any, value: Box<dyn Any + Send>) -> bool {
        self.accessor.set(instance, value)
    }
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl Descriptor for FieldDescriptor {
    type Key = FieldKey;
    const KIND: EntityKind = EntityKind::Field;

    fn key(&self) -> FieldKey {
        self.key
    }

    fn descriptor_name(&self) -> &str {
        &self.name
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.is_read_only == other.is_read_only
    }

    fn shape_label(&self) -> String {
        let read_only = if self.is_read_only { " read-only" } else { "" };
        format!("{}: {}{read_only}", self.name, self.field_type)
    }

    fn zero() -> &'static Self {
        &ZERO
    }
}

impl MemberDescriptor for FieldDescriptor {
    fn type_links(&self) -> Vec<&TypeLink> {
        vec![&self.field_type]
    }

    fn declared_keys(owner: &TypeDescriptor) -> &[FieldKey] {
        &owner.field_keys
    }

    fn declared_keys_mut(owner: &mut TypeDescriptor) -> &mut Vec<FieldKey> {
        &mut owner.field_keys
    }
}
