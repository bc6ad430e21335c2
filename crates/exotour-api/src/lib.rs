//! Exotour — read-only HTTP API over the star/exoplanet catalog.
//!
//! Serves the detail views the free-navigation pages render.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/stars", routes::stars::router())
        .nest("/api/v1/exoplanets", routes::exoplanets::router())
        .with_state(state)
}
