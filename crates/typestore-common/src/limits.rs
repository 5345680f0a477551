//! Centralized limits and thresholds for population and lookup.
//!
//! These values bound what the population step accepts and size the inline
//! buffers used by descriptors. They are compile-time constants; nothing in
//! the query path consults them.

// =============================================================================
// Population Limits
// =============================================================================

/// Maximum byte length of a member name.
///
/// The dispatch tables index their first tier directly by name length, so
/// the longest accepted name bounds the size of that index. Real member
/// names are nowhere near this; a longer name means the population input is
/// corrupt and registration fails.
pub const MAX_MEMBER_NAME_LEN: usize = 1024;

// =============================================================================
// Inline Capacities
// =============================================================================

/// Inline capacity for generic type argument lists.
///
/// Most generic instantiations carry one or two arguments (`List<T>`,
/// `Dictionary<K, V>`).
pub const INLINE_TYPE_ARGS: usize = 2;

/// Inline capacity for method parameter lists.
pub const INLINE_PARAMETERS: usize = 4;

/// Inline capacity for the first-character groups inside one length bucket.
pub const INLINE_CHAR_GROUPS: usize = 4;

/// Inline capacity for the candidates sharing a length and first character.
///
/// More than one candidate here is the rare case that falls through to the
/// hash-confirmed tier.
pub const INLINE_CANDIDATES: usize = 1;
