//! Common types and utilities for the typestore crates.
//!
//! This crate provides foundational types used across all typestore crates:
//! - Stable descriptor keys (`TypeKey`, `FieldKey`, `PropertyKey`, `MethodKey`)
//! - Type-name helpers (generic arity markers, host type names)
//! - Population limits and inline capacities

// Stable numeric identities for descriptors
pub mod keys;
pub use keys::{DescriptorKey, FieldKey, MethodKey, PropertyKey, TypeKey};

// Type-name conventions shared by population and fallback descriptors
pub mod names;

// Centralized limits and thresholds
pub mod limits;
