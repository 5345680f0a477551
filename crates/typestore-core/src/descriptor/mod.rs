//! Descriptor model.
//!
//! Descriptors are plain values describing the shape of a type or member.
//! They reference other types through `TypeLink`s, never by embedding, so a
//! type whose property refers back to itself (or to a type that refers back)
//! is just a pair of keys.
//!
//! ## Construction paths
//!
//! | Path | Reference | Accessor result |
//! |------|-----------|-----------------|
//! | Keyed | `TypeLink::Key` | Resolved through the registry |
//! | Name-based | `TypeLink::Named` | Fresh name-only descriptor (key 0) |
//!
//! Both paths produce the same struct; callers see the same shape either way.

mod field;
mod link;
mod method;
mod property;
mod ty;

pub use field::FieldDescriptor;
pub use link::{NamedType, TypeLink};
pub use method::{MethodDescriptor, ParameterTypes};
pub use property::PropertyDescriptor;
pub use ty::{TypeArgs, TypeDescriptor};

use crate::error::EntityKind;
use std::fmt;
use typestore_common::DescriptorKey;

/// Behaviour shared by every descriptor kind.
pub trait Descriptor: Clone + fmt::Debug + Send + Sync + 'static {
    type Key: DescriptorKey;

    /// Which registry this descriptor belongs to.
    const KIND: EntityKind;

    fn key(&self) -> Self::Key;

    fn descriptor_name(&self) -> &str;

    /// Everything but the bound accessor and the member key lists must
    /// match for a key to be registered twice.
    fn same_shape(&self, other: &Self) -> bool;

    /// Short rendering of the compared shape, for conflict reports.
    fn shape_label(&self) -> String;

    /// Shared zero-value descriptor handed out for unknown keys.
    fn zero() -> &'static Self;
}

/// Descriptors owned by a type (fields, properties, methods).
pub trait MemberDescriptor: Descriptor {
    /// Type references held by this member.
    fn type_links(&self) -> Vec<&TypeLink>;

    /// This member kind's key list on the owning type.
    fn declared_keys(owner: &TypeDescriptor) -> &[Self::Key];

    fn declared_keys_mut(owner: &mut TypeDescriptor) -> &mut Vec<Self::Key>;
}

#[cfg(test)]
#[path = "../../tests/descriptor_tests.rs"]
mod tests;
