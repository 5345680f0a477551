//! typestore: precomputed type metadata with perfect-hash member lookup.
//!
//! This crate is the facade over the workspace:
//!
//! - [`typestore_common`]: key newtypes, name helpers, limits
//! - [`typestore_core`]: descriptors, registries, dispatch, the store
//!
//! ```ignore
//! use typestore::{MetadataStore, PropertyDescriptor, PropertyKey, TypeDescriptor, TypeKey};
//!
//! let mut builder = MetadataStore::builder();
//! builder.register_type(TypeDescriptor::new(TypeKey(1), "Person").reference_type())?;
//! builder.register_property(TypeKey(1), PropertyDescriptor::new(PropertyKey(10), "Name", "String"))?;
//! let store = builder.build()?;
//!
//! let name = store.get_type(TypeKey(1)).get_property("Name");
//! ```

pub use typestore_common;
pub use typestore_core;

pub use typestore_common::names;
pub use typestore_core::*;

// Tracing subscriber setup for the binary (TYPESTORE_LOG / TYPESTORE_LOG_FORMAT)
pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;
