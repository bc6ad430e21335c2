//! Exotour — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use exotour_catalog::application::query_handlers::not_found_message;
use exotour_core::error::TourError;
use serde::Serialize;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] TourError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `TourError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub TourError);

impl From<TourError> for ApiError {
    fn from(err: TourError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            TourError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            TourError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            TourError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            TourError::AudioPlayback(_) | TourError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let message = not_found_message(&self.0)
            .map_or_else(|| self.0.to_string(), str::to_owned);
        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
