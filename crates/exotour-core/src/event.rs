//! Signal envelope shared by every component that emits coordination signals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of the wall-clock timestamps stamped on signals.
///
/// Delays and smoothing never read it; they run on
/// [`crate::frame::FrameTime`].
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Metadata attached to every emitted signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalMetadata {
    /// Unique signal identifier.
    pub signal_id: Uuid,
    /// Type name, e.g. `narrative.step_entered`.
    pub signal_type: String,
    /// The session (mounted page) that emitted the signal.
    pub session_id: Uuid,
    /// Monotonically increasing position within the session's signal stream.
    pub sequence_number: u64,
    /// Wall-clock time of emission.
    pub occurred_at: DateTime<Utc>,
}

impl SignalMetadata {
    /// Builds metadata for the next signal of a session.
    #[must_use]
    pub fn next(
        signal_type: &str,
        session_id: Uuid,
        sequence_number: u64,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            signal_id: Uuid::new_v4(),
            signal_type: signal_type.to_owned(),
            session_id,
            sequence_number,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all emitted signals implement.
pub trait Signal: Send + Sync + std::fmt::Debug {
    /// Returns the signal type name.
    fn signal_type(&self) -> &'static str;

    /// Serializes the signal payload to JSON (for logging and hosts).
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this signal.
    fn metadata(&self) -> &SignalMetadata;
}
