//! In-memory session store, the test analogue of browser local storage.

use crate::auth::ports::SessionStore;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe in-memory string key-value store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with entries, for migration tests and
    /// session restoration scenarios.
    #[must_use]
    pub fn seeded(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries.into_iter().collect())),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
