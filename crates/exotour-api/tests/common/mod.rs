//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use exotour_catalog::application::loader::{DatasetFormat, parse_records};
use exotour_catalog::domain::index::CatalogIndex;
use http_body_util::BodyExt;
use tower::ServiceExt;

use exotour_api::state::AppState;

/// Small catalog covering grouping, unknown fields and the Earth scale cap.
pub const DATASET: &str = r#"[
    {"id": 1, "hostname": "Kepler-42", "pl_name": "Kepler-42 b",
     "pl_bmasse": 2.86, "pl_rade": 0.78, "pl_orbper": 1.21,
     "st_teff": 3269, "st_met": 0.0, "sy_dist": 40.0, "st_spectype": "M5 V"},
    {"id": 2, "hostname": "Kepler-42", "pl_name": "Kepler-42 c", "pl_rade": 0.73},
    {"id": 3, "hostname": "TRAPPIST-1", "pl_name": "TRAPPIST-1 e",
     "pl_bmasse": 0.69, "pl_eqt": 250, "st_lum": -3.28, "inZh": 1},
    {"id": 4, "hostname": "HD 1", "pl_name": "HD 1 b", "pl_bmasse": 300.0}
]"#;

/// Build the full app router over the fixture catalog. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app() -> Router {
    let records = parse_records(DATASET, DatasetFormat::Json).unwrap();
    let catalog = CatalogIndex::build(records).unwrap();
    exotour_api::build_router(AppState::new(Arc::new(catalog)))
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
