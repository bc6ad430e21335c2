//! Test stores — `KeyValueStore` fakes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use exotour_core::error::TourError;
use exotour_core::storage::KeyValueStore;

/// An in-memory store. Clones share the same map, so a clone stands in for
/// "the same persistence scope" across simulated remounts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    /// Returns every `set` call made so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, TourError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TourError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A store whose reads and writes always fail with an infrastructure error.
#[derive(Debug, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, TourError> {
        Err(TourError::Infrastructure("storage unavailable".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), TourError> {
        Err(TourError::Infrastructure("storage unavailable".into()))
    }
}
