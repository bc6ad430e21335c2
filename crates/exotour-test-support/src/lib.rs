//! Shared test fakes and utilities for the Exotour choreography engine.

mod audio;
mod clock;
mod navigation;
mod scroll;
mod storage;

pub use audio::{AudioCall, FailingAudioBackend, RecordingAudioBackend};
pub use clock::FixedClock;
pub use navigation::RecordingNavigator;
pub use scroll::FakeScrollSurface;
pub use storage::{FailingKeyValueStore, InMemoryKeyValueStore};
