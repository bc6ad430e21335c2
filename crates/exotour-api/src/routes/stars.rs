//! Routes for host stars.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::{debug, instrument};

use exotour_catalog::application::query_handlers::{self, StarDetailsView, StarSummaryView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_stars(State(state): State<AppState>) -> Json<Vec<StarSummaryView>> {
    let stars = query_handlers::list_stars(&state.catalog);
    debug!(count = stars.len(), "listing stars");
    Json(stars)
}

/// GET /{host}
#[instrument(skip(state))]
async fn get_star(
    State(state): State<AppState>,
    Path(host): Path<String>,
) -> Result<Json<StarDetailsView>, ApiError> {
    let view = query_handlers::get_star_details(&state.catalog, &host)?;
    Ok(Json(view))
}

/// Returns the router for host stars.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stars))
        .route("/{host}", get(get_star))
}
