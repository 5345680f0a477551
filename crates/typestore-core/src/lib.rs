//! Runtime type-metadata store.
//!
//! Descriptors for types, fields, properties and methods are registered once
//! in a population batch, frozen into a `MetadataStore`, and then queried
//! concurrently without locks.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`descriptor`] | Descriptor structs and `TypeLink` references |
//! | [`accessor`] | Pre-bound getter/setter closures |
//! | [`registry`] | Per-kind key and name indexes |
//! | [`dispatch`] | Per-type perfect-hash name dispatch |
//! | [`store`] | `StoreBuilder` and the frozen `MetadataStore` |
//! | [`handle`] | Lazy navigation between descriptors |
//! | [`manifest`] | JSON population input |
//! | [`global`] | Optional process-wide store |
//!
//! Lookups by key never fail: an unknown key yields the zero-value
//! descriptor (`key == 0`). Lookups by name yield `None` for unknown names.

pub mod accessor;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod global;
pub mod handle;
pub mod manifest;
pub mod registry;
pub mod store;

pub use accessor::{Accessor, Getter, Setter};
pub use descriptor::{
    Descriptor, FieldDescriptor, MemberDescriptor, MethodDescriptor, NamedType,
    PropertyDescriptor, TypeDescriptor, TypeLink,
};
pub use dispatch::{DispatchHit, DispatchStats, DispatchTable, DispatchTier};
pub use error::{EntityKind, PopulationError};
pub use flags::{PropertyAccess, TypeFlags};
pub use handle::{FieldHandle, Handle, MethodHandle, PropertyHandle, TypeHandle};
pub use manifest::Manifest;
pub use registry::{FieldRegistry, MethodRegistry, PropertyRegistry, Registration, TypeRegistry};
pub use store::{BuildOptions, MemberDispatch, MetadataStore, StoreBuilder};
pub use typestore_common::{DescriptorKey, FieldKey, MethodKey, PropertyKey, TypeKey};
