//! Persistent key-value store port.

use crate::error::TourError;

/// Key-value store that outlives the process (browser local storage, a state
/// file, ...). Used for "has the user seen this" flags.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. A missing key is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Infrastructure` if the backing store is unreadable.
    fn get(&self, key: &str) -> Result<Option<String>, TourError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Infrastructure` if the write cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), TourError>;
}
