//! Query handles.
//!
//! A handle pairs a descriptor with the store it came from, so that
//! relationships (member lists, property types, generic arguments) can be
//! followed lazily through the registries. Registered descriptors are
//! borrowed from the store; name-only fallbacks are owned by the handle.
//!
//! Handles deref to their descriptor, so plain attributes read directly:
//!
//! ```ignore
//! let person = store.get_type(PERSON);
//! let name = person.get_property("Name").expect("declared");
//! assert_eq!(&*name.name, "Name");
//! assert_eq!(&*name.property_type().name, "String");
//! ```

use crate::descriptor::{
    FieldDescriptor, MethodDescriptor, PropertyDescriptor, TypeDescriptor, TypeLink,
};
use crate::store::MetadataStore;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// A descriptor bound to its store.
pub struct Handle<'s, D: Clone> {
    store: &'s MetadataStore,
    descriptor: Cow<'s, D>,
}

pub type TypeHandle<'s> = Handle<'s, TypeDescriptor>;
pub type FieldHandle<'s> = Handle<'s, FieldDescriptor>;
pub type PropertyHandle<'s> = Handle<'s, PropertyDescriptor>;
pub type MethodHandle<'s> = Handle<'s, MethodDescriptor>;

impl<'s, D: Clone> Handle<'s, D> {
    pub(crate) fn borrowed(store: &'s MetadataStore, descriptor: &'s D) -> Self {
        Self {
            store,
            descriptor: Cow::Borrowed(descriptor),
        }
    }

    pub(crate) fn owned(store: &'s MetadataStore, descriptor: D) -> Self {
        Self {
            store,
            descriptor: Cow::Owned(descriptor),
        }
    }

    pub fn store(&self) -> &'s MetadataStore {
        self.store
    }

    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Detach the descriptor from the store.
    pub fn into_descriptor(self) -> D {
        self.descriptor.into_owned()
    }

    /// True for synthesized name-only descriptors.
    pub fn is_fallback(&self) -> bool {
        matches!(self.descriptor, Cow::Owned(_))
    }
}

impl<D: Clone> Deref for Handle<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.descriptor
    }
}

impl<D: Clone> Clone for Handle<'_, D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<D: Clone + fmt::Debug> fmt::Debug for Handle<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.descriptor, f)
    }
}

// =============================================================================
// TypeHandle
// =============================================================================

impl<'s> TypeHandle<'s> {
    /// Find a field by name. `None` if the type has no such field (or the
    /// type itself is unresolved).
    pub fn get_field(&self, name: &str) -> Option<FieldHandle<'s>> {
        self.store.field_by_name(self.descriptor.key, name)
    }

    pub fn get_property(&self, name: &str) -> Option<PropertyHandle<'s>> {
        self.store.property_by_name(self.descriptor.key, name)
    }

    pub fn get_method(&self, name: &str) -> Option<MethodHandle<'s>> {
        self.store.method_by_name(self.descriptor.key, name)
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> Vec<FieldHandle<'s>> {
        let store = self.store;
        self.descriptor
            .field_keys
            .iter()
            .map(|key| store.get_field(*key))
            .collect()
    }

    pub fn properties(&self) -> Vec<PropertyHandle<'s>> {
        let store = self.store;
        self.descriptor
            .property_keys
            .iter()
            .map(|key| store.get_property(*key))
            .collect()
    }

    pub fn methods(&self) -> Vec<MethodHandle<'s>> {
        let store = self.store;
        self.descriptor
            .method_keys
            .iter()
            .map(|key| store.get_method(*key))
            .collect()
    }

    /// The wrapped type of a nullable type.
    pub fn underlying_type(&self) -> Option<TypeHandle<'s>> {
        if !self.descriptor.is_nullable() {
            return None;
        }
        let store = self.store;
        self.descriptor
            .underlying_type
            .as_ref()
            .map(|link| store.resolve_link(link))
    }

    /// Type arguments of a constructed generic type; empty otherwise.
    pub fn generic_type_arguments(&self) -> Vec<TypeHandle<'s>> {
        let store = self.store;
        self.descriptor
            .generic_type_arguments
            .iter()
            .flatten()
            .map(|link| store.resolve_link(link))
            .collect()
    }
}

// =============================================================================
// Member handles
// =============================================================================

impl<'s> FieldHandle<'s> {
    pub fn field_type(&self) -> TypeHandle<'s> {
        self.store.resolve_link(&self.descriptor.field_type)
    }

    /// The type this field was registered to.
    pub fn declaring_type(&self) -> TypeHandle<'s> {
        let owner = self.store.fields().owner_of(self.descriptor.key);
        self.store.get_type(owner.unwrap_or_default())
    }
}

impl<'s> PropertyHandle<'s> {
    pub fn property_type(&self) -> TypeHandle<'s> {
        self.store.resolve_link(&self.descriptor.property_type)
    }

    pub fn declaring_type(&self) -> TypeHandle<'s> {
        let owner = self.store.properties().owner_of(self.descriptor.key);
        self.store.get_type(owner.unwrap_or_default())
    }
}

impl<'s> MethodHandle<'s> {
    pub fn return_type(&self) -> TypeHandle<'s> {
        self.store.resolve_link(&self.descriptor.return_type)
    }

    pub fn parameter_types(&self) -> Vec<TypeHandle<'s>> {
        let store = self.store;
        self.descriptor
            .parameter_types
            .iter()
            .map(|link: &TypeLink| store.resolve_link(link))
            .collect()
    }

    pub fn declaring_type(&self) -> TypeHandle<'s> {
        let owner = self.store.methods().owner_of(self.descriptor.key);
        self.store.get_type(owner.unwrap_or_default())
    }
}
