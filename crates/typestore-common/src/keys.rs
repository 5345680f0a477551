//! Stable numeric keys for descriptors.
//!
//! Every descriptor in the store is addressed by a 64-bit key. Keys are
//! assigned by whatever populates the store (usually a code generator that
//! hashes the symbol it discovered) and are never reused.
//!
//! Key `0` is reserved in every key space: it marks an unresolved reference
//! and is what lookups of unknown keys hand back.
//!
//! | Key | Addresses |
//! |-----|-----------|
//! | `TypeKey` | `TypeDescriptor` |
//! | `FieldKey` | `FieldDescriptor` |
//! | `PropertyKey` | `PropertyDescriptor` |
//! | `MethodKey` | `MethodDescriptor` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Behaviour shared by all descriptor keys.
pub trait DescriptorKey: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Sentinel for "unresolved / unknown".
    const INVALID: Self;

    /// Wrap a raw key.
    fn from_raw(raw: u64) -> Self;

    /// The raw 64-bit value.
    fn raw(self) -> u64;

    /// Check if this key addresses a real descriptor.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Sentinel value for an unresolved reference.
            pub const INVALID: Self = Self(0);

            /// First valid key.
            pub const FIRST_VALID: u64 = 1;

            /// Check if this key addresses a real descriptor.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 >= Self::FIRST_VALID
            }

            /// Get the raw key value.
            #[inline]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl DescriptorKey for $name {
            const INVALID: Self = Self(0);

            #[inline]
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

define_key!(
    /// Key of a `TypeDescriptor`.
    TypeKey,
    "type"
);

define_key!(
    /// Key of a `FieldDescriptor`.
    FieldKey,
    "field"
);

define_key!(
    /// Key of a `PropertyDescriptor`.
    PropertyKey,
    "property"
);

define_key!(
    /// Key of a `MethodDescriptor`.
    MethodKey,
    "method"
);

#[cfg(test)]
#[path = "../tests/keys_tests.rs"]
mod tests;
