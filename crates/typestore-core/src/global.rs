//! Process-wide store.
//!
//! Programs that populate once at startup can install the built store here
//! and query it from anywhere. Installation happens at most once; before
//! that, `store()` answers from an empty store (every key resolves to the
//! zero-value descriptor).

use crate::store::MetadataStore;
use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

static INSTALLED: OnceCell<MetadataStore> = OnceCell::new();
static EMPTY: Lazy<MetadataStore> = Lazy::new(MetadataStore::empty);

/// Install `store` as the process-wide store.
///
/// Returns the store back if one was already installed.
pub fn install(store: MetadataStore) -> Result<(), MetadataStore> {
    let types = store.len();
    INSTALLED.set(store)?;
    debug!(types, "global::install");
    Ok(())
}

/// The installed store, or an empty one.
pub fn store() -> &'static MetadataStore {
    INSTALLED.get().unwrap_or(&EMPTY)
}

pub fn is_installed() -> bool {
    INSTALLED.get().is_some()
}
