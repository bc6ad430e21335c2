//! Audio cue driver.
//!
//! Owns the single playing clip. Starting a cue always stops and rewinds the
//! previous one first, so at most one cue is audible at any instant.

use std::collections::BTreeMap;
use std::fmt;

use exotour_content::domain::steps::CueId;
use exotour_core::audio::{AudioBackend, AudioChannel};
use exotour_core::error::TourError;
use tracing::{debug, warn};

/// The clip currently owned by the driver. Dropping it silences the clip.
struct ActiveCue {
    cue: CueId,
    channel: Box<dyn AudioChannel>,
}

impl Drop for ActiveCue {
    fn drop(&mut self) {
        self.channel.pause();
        self.channel.reset_position();
    }
}

/// Plays at most one audio cue at a time.
///
/// Failures never propagate: an unknown cue, a clip that cannot be loaded or
/// a clip that refuses to play is logged and the driver falls silent.
pub struct AudioCueDriver {
    backend: Box<dyn AudioBackend>,
    cues: BTreeMap<CueId, String>,
    active: Option<ActiveCue>,
}

impl fmt::Debug for AudioCueDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioCueDriver")
            .field("cues", &self.cues)
            .field("active", &self.active_cue())
            .finish_non_exhaustive()
    }
}

impl AudioCueDriver {
    /// Creates a silent driver that resolves cue ids through `cues`.
    #[must_use]
    pub fn new(backend: Box<dyn AudioBackend>, cues: BTreeMap<CueId, String>) -> Self {
        Self {
            backend,
            cues,
            active: None,
        }
    }

    /// The cue currently playing, if any.
    #[must_use]
    pub fn active_cue(&self) -> Option<&CueId> {
        self.active.as_ref().map(|active| &active.cue)
    }

    /// Stops whatever is playing, then starts `cue`.
    pub fn play(&mut self, cue: &CueId) {
        self.stop_all();

        let Some(source) = self.cues.get(cue) else {
            warn!(cue = %cue, "no audio source declared for cue");
            return;
        };
        let mut channel = match self.backend.load(source) {
            Ok(channel) => channel,
            Err(e) => {
                warn!(cue = %cue, source = %source, error = %e, "audio cue failed to load");
                return;
            }
        };
        if let Err(e) = channel.play() {
            warn!(cue = %cue, source = %source, error = %e, "audio cue failed to play");
            return;
        }
        debug!(cue = %cue, source = %source, "audio cue started");
        self.active = Some(ActiveCue {
            cue: cue.clone(),
            channel,
        });
    }

    /// Stops and rewinds the playing cue, if any.
    pub fn stop_all(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(cue = %active.cue, "audio cue stopped");
        }
    }

    /// Handles a playback failure reported after `play` returned. Reports for
    /// a cue that is no longer active are ignored.
    pub fn on_playback_error(&mut self, cue: &CueId, error: &TourError) {
        if self.active_cue() != Some(cue) {
            debug!(cue = %cue, "ignoring playback error for inactive cue");
            return;
        }
        warn!(cue = %cue, error = %error, "audio cue failed during playback");
        self.active = None;
    }
}
