//! Type-name conventions.
//!
//! Two naming schemes meet in the store:
//!
//! - **Metadata names** come from the population input. Generic type
//!   definitions there follow the `Name`N` convention (`List`1`,
//!   `Dictionary`2`): a backtick followed by the generic arity.
//! - **Host names** come from `std::any::type_name` when application code
//!   asks for the descriptor of a Rust value that was never bound to a key.
//!   These are full paths (`alloc::vec::Vec<alloc::string::String>`).

/// Check whether `name` ends in a generic arity marker: a backtick followed
/// by one or more ASCII digits (`List`1`).
///
/// Only used when a type is known by name alone; registered types carry an
/// explicit generic flag.
pub fn has_generic_arity_marker(name: &str) -> bool {
    match name.rfind('`') {
        Some(pos) => {
            let digits = &name[pos + 1..];
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// The generic arity encoded in a metadata name (`Dictionary`2` -> 2).
pub fn generic_arity(name: &str) -> Option<usize> {
    if !has_generic_arity_marker(name) {
        return None;
    }
    let pos = name.rfind('`')?;
    name[pos + 1..].parse().ok()
}

/// Strip module paths from a host type name, keeping type arguments.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`;
/// references, slices and tuples keep their punctuation.
pub fn short_host_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment);
    out
}

/// Check whether a host type name carries type arguments.
pub fn host_name_is_generic(full: &str) -> bool {
    full.contains('<')
}

#[cfg(test)]
#[path = "../tests/names_tests.rs"]
mod tests;
