//! Domain error types.

use thiserror::Error;

/// Top-level error type for the choreography engine.
///
/// Nothing in the engine is allowed to terminate the host because of one of
/// these: callers resolve them locally with a safe fallback.
#[derive(Debug, Error)]
pub enum TourError {
    /// A catalog lookup missed.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of entity that was looked up (e.g. "star", "exoplanet").
        entity: &'static str,
        /// The lookup key, rendered for display.
        key: String,
    },

    /// A state machine was asked for a transition it does not allow.
    #[error("invalid transition: cannot {action} while {from}")]
    InvalidTransition {
        /// The state the machine was in.
        from: String,
        /// The rejected action.
        action: &'static str,
    },

    /// Audio could not be loaded or played.
    #[error("audio playback failure: {0}")]
    AudioPlayback(String),

    /// Invalid configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl TourError {
    /// Shorthand for a [`TourError::NotFound`].
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`TourError::InvalidTransition`].
    pub fn invalid_transition(from: impl ToString, action: &'static str) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_key() {
        let err = TourError::not_found("exoplanet", 9999);
        assert_eq!(err.to_string(), "exoplanet not found: 9999");
    }

    #[test]
    fn test_invalid_transition_message_names_state_and_action() {
        let err = TourError::invalid_transition("idle", "advance");
        assert_eq!(
            err.to_string(),
            "invalid transition: cannot advance while idle"
        );
    }
}
