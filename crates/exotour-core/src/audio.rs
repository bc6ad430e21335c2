//! Audio playback port.

use crate::error::TourError;

/// A loaded clip, positioned at its start.
pub trait AudioChannel {
    /// Starts (or resumes) playback. Completion is fire-and-forget; failures
    /// reported later go through the driver's error callback.
    ///
    /// # Errors
    ///
    /// Returns `TourError::AudioPlayback` if playback cannot start.
    fn play(&mut self) -> Result<(), TourError>;

    /// Pauses playback.
    fn pause(&mut self);

    /// Rewinds to the start of the clip.
    fn reset_position(&mut self);
}

/// Loads clips from sources (paths or URLs).
pub trait AudioBackend {
    /// Loads `source` into a new channel.
    ///
    /// # Errors
    ///
    /// Returns `TourError::AudioPlayback` if the source cannot be loaded.
    fn load(&mut self, source: &str) -> Result<Box<dyn AudioChannel>, TourError>;
}
