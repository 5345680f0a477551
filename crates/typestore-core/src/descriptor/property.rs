//! Property descriptors.

use super::{Descriptor, MemberDescriptor, TypeDescriptor, TypeLink};
use crate::accessor::Accessor;
use crate::error::EntityKind;
use crate::flags::PropertyAccess;
use once_cell::sync::Lazy;
use std::any::Any;
use std::sync::Arc;
use typestore_common::{PropertyKey, TypeKey};

static ZERO: Lazy<PropertyDescriptor> = Lazy::new(PropertyDescriptor::unresolved);

/// A property of a type.
///
/// `access` records what the declaring type exposes; `accessor` records
/// what was actually bound at registration. A readable property without a
/// bound getter still reports `can_read()` but `get_value` returns `None`.
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    pub key: PropertyKey,
    pub name: Arc<str>,
    pub property_type: TypeLink,
    pub access: PropertyAccess,
    pub accessor: Accessor,
}

impl PropertyDescriptor {
    /// Create a metadata-only, readable and writable property.
    pub fn new(
        key: PropertyKey,
        name: impl Into<Arc<str>>,
        property_type: impl Into<TypeLink>,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            property_type: property_type.into(),
            access: PropertyAccess::READ_WRITE,
            accessor: Accessor::none(),
        }
    }

    /// The zero-value descriptor.
    pub fn unresolved() -> Self {
        Self::new(PropertyKey::INVALID, "", TypeLink::unresolved()).with_access(PropertyAccess::empty())
    }

    pub fn with_access(mut self, access: PropertyAccess) -> Self {
        self.access = access;
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

    #[inline]
    pub fn can_read(&self) -> bool {
        self.access.contains(PropertyAccess::READ)
    }

    #[inline]
    pub fn can_write(&self) -> bool {
        self.access.contains(PropertyAccess::WRITE)
    }

    /// `TypeKey::INVALID` when the property type is known by name only.
    pub fn property_type_key(&self) -> TypeKey {
        self.property_type.type_key()
    }

    pub fn property_type_name(&self) -> Option<&str> {
        self.property_type.type_name()
    }

    /// Read the property from `instance`. `None` when no getter is bound.
    pub fn get_value(&self, instance: &dyn Any) -> Option<Box<dyn Any + Send>> {
        self.accessor.get(instance)
    }

    pub fn get_value_as<V: Any>(&self, instance: &dyn Any) -> Option<V> {
        self.get_value(instance)?.downcast::<V>().ok().map(|value| *value)
    }

    /// Write the property on `instance`. No-op returning `false` when no
    /// setter is bound.
    pub fn set_value<V: Any + Send>(&self, instance: &mut dyn Any, value: V) -> bool {
        self.accessor.set(instance, Box::new(value))
    }

    pub fn set_value_boxed(&self, instance: &mut dyn Any, value: Box<dyn Any + Send>) -> bool {
        self.accessor.set(instance, value)
    }
}

impl Default for PropertyDescriptor {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl Descriptor for PropertyDescriptor {
    type Key = PropertyKey;
    const KIND: EntityKind = EntityKind::Property;

    fn key(&self) -> PropertyKey {
        self.key
    }

    fn descriptor_name(&self) -> &str {
        &self.name
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.property_type == other.property_type
            && self.access == other.access
    }

    fn shape_label(&self) -> String {
        let access = match (self.can_read(), self.can_write()) {
            (true, true) => "{ get; set }",
            (true, false) => "{ get }",
            (false, true) => "{ set }",
            (false, false) => "{ }",
        };
        format!("{}: {} {access}", self.name, self.property_type)
    }

    fn zero() -> &'static Self {
        &ZERO
    }
}

impl MemberDescriptor for PropertyDescriptor {
    fn type_links(&self) -> Vec<&TypeLink> {
        vec![&self.property_type]
    }

    fn declared_keys(owner: &TypeDescriptor) -> &[PropertyKey] {
        &owner.property_keys
    }

    fn declared_keys_mut(owner: &mut TypeDescriptor) -> &mut Vec<PropertyKey> {
        &mut owner.property_keys
    }
}
