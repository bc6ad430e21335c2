//! Exotour catalog API server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use exotour_api::error::AppError;
use exotour_api::state::AppState;
use exotour_catalog::application::loader::load_catalog;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Exotour catalog API server");

    // Read configuration from environment.
    let catalog_path: PathBuf = std::env::var("CATALOG_PATH")
        .map_err(|_| AppError::Config("CATALOG_PATH environment variable must be set".into()))?
        .into();
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // The catalog is static: load and index it once.
    let catalog = load_catalog(&catalog_path)?;
    let app_state = AppState::new(Arc::new(catalog));

    // The catalog is public and read-only, so any origin may fetch it.
    let app = exotour_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
