//! Shared application state.

use std::sync::Arc;

use exotour_catalog::domain::index::CatalogIndex;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The catalog, built once at startup and never mutated.
    pub catalog: Arc<CatalogIndex>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self { catalog }
    }
}
