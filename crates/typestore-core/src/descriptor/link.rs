//! References from one descriptor to a type.
//!
//! Descriptors never embed other descriptors. A reference to a type is
//! either a key that the store resolves lazily, or (when the referenced type
//! never got a descriptor) a bare name from which a name-only fallback is
//! synthesized on access.

use crate::flags::TypeFlags;
use std::fmt;
use std::sync::Arc;
use typestore_common::TypeKey;
use typestore_common::names::has_generic_arity_marker;

/// A reference to a type, by key or by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeLink {
    /// Resolved through the type registry at access time.
    Key(TypeKey),
    /// The type has no descriptor; only a label is known.
    Named(NamedType),
}

/// Label and flags for a type known by name only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub name: Arc<str>,
    pub flags: TypeFlags,
}

impl TypeLink {
    /// Reference a registered (or yet-to-be-registered) type.
    pub const fn key(key: TypeKey) -> Self {
        TypeLink::Key(key)
    }

    /// Reference a type by name.
    ///
    /// The generic flag is derived here, once, from the arity marker
    /// (`List`1`) and stored; nothing downstream looks at the name again.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let flags = if has_generic_arity_marker(&name) {
            TypeFlags::GENERIC
        } else {
            TypeFlags::empty()
        };
        TypeLink::Named(NamedType { name, flags })
    }

    /// Reference a type by name with explicit flags.
    pub fn named_with_flags(name: impl Into<Arc<str>>, flags: TypeFlags) -> Self {
        TypeLink::Named(NamedType {
            name: name.into(),
            flags,
        })
    }

    /// The unresolved link (`Key(0)`).
    pub const fn unresolved() -> Self {
        TypeLink::Key(TypeKey::INVALID)
    }

    /// The referenced key, or `TypeKey::INVALID` for name-only links.
    pub fn type_key(&self) -> TypeKey {
        match self {
            TypeLink::Key(key) => *key,
            TypeLink::Named(_) => TypeKey::INVALID,
        }
    }

    /// The fallback label for name-only links.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeLink::Key(_) => None,
            TypeLink::Named(named) => Some(&named.name),
        }
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, TypeLink::Key(key) if key.is_valid())
    }
}

impl Default for TypeLink {
    fn default() -> Self {
        TypeLink::unresolved()
    }
}

impl From<TypeKey> for TypeLink {
    fn from(key: TypeKey) -> Self {
        TypeLink::Key(key)
    }
}

impl From<&str> for TypeLink {
    fn from(name: &str) -> Self {
        TypeLink::named(name)
    }
}

impl From<String> for TypeLink {
    fn from(name: String) -> Self {
        TypeLink::named(name)
    }
}

impl fmt::Display for TypeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeLink::Key(key) => write!(f, "{key}"),
            TypeLink::Named(named) => write!(f, "'{}'", named.name),
        }
    }
}
