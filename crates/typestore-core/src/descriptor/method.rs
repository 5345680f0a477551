//! Method descriptors.
//!
//! Methods are metadata only: name, static-ness, return and parameter types.
//! There is no invocation entry point.

use super::{Descriptor, MemberDescriptor, TypeDescriptor, TypeLink};
use crate::error::EntityKind;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::sync::Arc;
use typestore_common::limits::INLINE_PARAMETERS;
use typestore_common::{MethodKey, TypeKey};

static ZERO: Lazy<MethodDescriptor> = Lazy::new(MethodDescriptor::unresolved);

pub type ParameterTypes = SmallVec<[TypeLink; INLINE_PARAMETERS]>;

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDescriptor {
    pub key: MethodKey,
    pub name: Arc<str>,
    pub return_type: TypeLink,
    pub is_static: bool,
    pub parameter_types: ParameterTypes,
}

impl MethodDescriptor {
    pub fn new(key: MethodKey, name: impl Into<Arc<str>>, return_type: impl Into<TypeLink>) -> Self {
        Self {
            key,
            name: name.into(),
            return_type: return_type.into(),
            is_static: false,
            parameter_types: SmallVec::new(),
        }
    }

    /// The zero-value descriptor.
    pub fn unresolved() -> Self {
        Self::new(MethodKey::INVALID, "", TypeLink::unresolved())
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeLink>,
    {
        self.parameter_types = parameters.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.key.is_valid()
    }

    pub fn return_type_key(&self) -> TypeKey {
        self.return_type.type_key()
    }

    pub fn parameter_type_keys(&self) -> Vec<TypeKey> {
        self.parameter_types.iter().map(TypeLink::type_key).collect()
    }
}

impl Default for MethodDescriptor {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl Descriptor for MethodDescriptor {
    type Key = MethodKey;
    const KIND: EntityKind = EntityKind::Method;

    fn key(&self) -> MethodKey {
        self.key
    }

    fn descriptor_name(&self) -> &str {
        &self.name
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name
            && self.return_type == other.return_type
            && self.is_static == other.is_static
            && self.parameter_types == other.parameter_types
    }

    fn shape_label(&self) -> String {
        let parameters: Vec<String> = self.parameter_types.iter().map(ToString::to_string).collect();
        let prefix = if self.is_static { "static " } else { "" };
        format!("{prefix}{}({}) -> {}", self.name, parameters.join(", "), self.return_type)
    }

    fn zero() -> &'static Self {
        &ZERO
    }
}

impl MemberDescriptor for MethodDescriptor {
    fn type_links(&self) -> Vec<&TypeLink> {
        std::iter::once(&self.return_type)
            .chain(self.parameter_types.iter())
            .collect()
    }

    fn declared_keys(owner: &TypeDescriptor) -> &[MethodKey] {
        &owner.method_keys
    }

    fn declared_keys_mut(owner: &mut TypeDescriptor) -> &mut Vec<MethodKey> {
        &mut owner.method_keys
    }
}
