//! Routes for individual exoplanets.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use exotour_catalog::application::query_handlers::{self, ExoplanetDetailsView};
use exotour_catalog::domain::records::CatalogId;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{id}
#[instrument(skip(state))]
async fn get_exoplanet(
    State(state): State<AppState>,
    Path(id): Path<CatalogId>,
) -> Result<Json<ExoplanetDetailsView>, ApiError> {
    let view = query_handlers::get_exoplanet_details(&state.catalog, id)?;
    Ok(Json(view))
}

/// Returns the router for exoplanets.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_exoplanet))
}
