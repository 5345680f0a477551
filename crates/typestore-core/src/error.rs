//! Population-time integrity errors.
//!
//! Queries against a built store never fail: unknown keys resolve to the
//! zero-value descriptor and unknown names resolve to `None`. The only
//! fallible phase is population, and any error there aborts it entirely.

use std::fmt;
use typestore_common::TypeKey;

/// Which descriptor table an error or log line concerns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Type,
    Field,
    Property,
    Method,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Type => "type",
            EntityKind::Field => "field",
            EntityKind::Property => "property",
            EntityKind::Method => "method",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when population input is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationError {
    /// A descriptor was registered under the reserved key `0`.
    ReservedKey { kind: EntityKind, name: String },

    /// A key was registered twice with a different shape (names, owner,
    /// flags or type references).
    ConflictingDescriptor {
        kind: EntityKind,
        key: u64,
        existing: String,
        incoming: String,
    },

    /// Two distinct members of one type share a name.
    MemberNameCollision {
        kind: EntityKind,
        owner: TypeKey,
        name: String,
        existing: u64,
        incoming: u64,
    },

    /// A member name is empty or longer than `MAX_MEMBER_NAME_LEN`.
    InvalidMemberName {
        kind: EntityKind,
        key: u64,
        name: String,
    },

    /// A type lists a member key that is registered to another type.
    ForeignMember {
        kind: EntityKind,
        key: u64,
        declared_by: TypeKey,
        owned_by: TypeKey,
    },

    /// A registered type claims to be both a value and a reference type.
    AmbiguousTypeKind { key: TypeKey, name: String },

    /// A registered type has an underlying type but is not nullable.
    UnderlyingWithoutNullable { key: TypeKey, name: String },

    /// A member's owning type was never registered (orphans disallowed).
    OrphanMember {
        kind: EntityKind,
        key: u64,
        owner: TypeKey,
    },

    /// A key reference points nowhere (strict reference checking only).
    DanglingReference { from: String, target: String },

    /// The population manifest could not be decoded.
    Manifest(String),
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulationError::ReservedKey { kind, name } => {
                write!(f, "{kind} '{name}' uses the reserved key 0")
            }
            PopulationError::ConflictingDescriptor {
                kind,
                key,
                existing,
                incoming,
            } => write!(
                f,
                "{kind} key {key} registered twice with different shapes ('{existing}' vs '{incoming}')"
            ),
            PopulationError::MemberNameCollision {
                kind,
                owner,
                name,
                existing,
                incoming,
            } => write!(
                f,
                "{kind} name '{name}' on {owner} maps to both {existing} and {incoming}"
            ),
            PopulationError::InvalidMemberName { kind, key, name } => {
                write!(f, "{kind} key {key} has invalid name '{name}'")
            }
            PopulationError::ForeignMember {
                kind,
                key,
                declared_by,
                owned_by,
            } => write!(
                f,
                "{kind} key {key} is declared by {declared_by} but registered to {owned_by}"
            ),
            PopulationError::AmbiguousTypeKind { key, name } => write!(
                f,
                "type '{name}' ({key}) is marked both value type and reference type"
            ),
            PopulationError::UnderlyingWithoutNullable { key, name } => write!(
                f,
                "type '{name}' ({key}) has an underlying type but is not nullable"
            ),
            PopulationError::OrphanMember { kind, key, owner } => {
                write!(f, "{kind} key {key} belongs to unregistered {owner}")
            }
            PopulationError::DanglingReference { from, target } => {
                write!(f, "{from} references unregistered {target}")
            }
            PopulationError::Manifest(message) => write!(f, "invalid manifest: {message}"),
        }
    }
}

impl std::error::Error for PopulationError {}

impl From<serde_json::Error> for PopulationError {
    fn from(err: serde_json::Error) -> Self {
        PopulationError::Manifest(err.to_string())
    }
}
