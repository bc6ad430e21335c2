//! Player error types.

use exotour_core::error::TourError;
use thiserror::Error;

/// Startup and runtime errors for the player.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A script, catalog or state store failed, or the tour rejected input.
    #[error("tour error: {0}")]
    Tour(#[from] TourError),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
