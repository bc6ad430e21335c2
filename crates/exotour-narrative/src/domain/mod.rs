//! Domain layer for the Narrative context.

pub mod audio_driver;
pub mod sequencer;
pub mod signals;
pub mod timeline;
