//! Test audio — `AudioBackend` fakes that record every call.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use exotour_core::audio::{AudioBackend, AudioChannel};
use exotour_core::error::TourError;

/// One recorded interaction with the audio port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    /// A source was loaded.
    Load(String),
    /// Playback started.
    Play(String),
    /// Playback paused.
    Pause(String),
    /// Position rewound to the start.
    Reset(String),
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<AudioCall>,
    playing: BTreeSet<u64>,
    max_concurrent: usize,
    next_channel: u64,
}

/// An audio backend that records calls and tracks how many channels are
/// playing at once.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudioBackend {
    journal: Rc<RefCell<Journal>>,
    reject_play: bool,
}

impl RecordingAudioBackend {
    /// Creates a backend whose channels always play.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose channels load but refuse to play, like a
    /// browser blocking autoplay.
    #[must_use]
    pub fn rejecting_play() -> Self {
        Self {
            reject_play: true,
            ..Self::default()
        }
    }

    /// Returns every recorded call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        self.journal.borrow().calls.clone()
    }

    /// Returns the sources that were started, in order.
    #[must_use]
    pub fn played_sources(&self) -> Vec<String> {
        self.journal
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                AudioCall::Play(source) => Some(source.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of channels currently playing.
    #[must_use]
    pub fn playing_count(&self) -> usize {
        self.journal.borrow().playing.len()
    }

    /// Highest number of channels that were ever playing simultaneously.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.journal.borrow().max_concurrent
    }
}

impl AudioBackend for RecordingAudioBackend {
    fn load(&mut self, source: &str) -> Result<Box<dyn AudioChannel>, TourError> {
        let mut journal = self.journal.borrow_mut();
        journal.calls.push(AudioCall::Load(source.to_owned()));
        let id = journal.next_channel;
        journal.next_channel += 1;
        Ok(Box::new(RecordingChannel {
            id,
            source: source.to_owned(),
            journal: Rc::clone(&self.journal),
            reject_play: self.reject_play,
        }))
    }
}

struct RecordingChannel {
    id: u64,
    source: String,
    journal: Rc<RefCell<Journal>>,
    reject_play: bool,
}

impl AudioChannel for RecordingChannel {
    fn play(&mut self) -> Result<(), TourError> {
        if self.reject_play {
            return Err(TourError::AudioPlayback(format!(
                "playback of {} was blocked",
                self.source
            )));
        }
        let mut journal = self.journal.borrow_mut();
        journal.calls.push(AudioCall::Play(self.source.clone()));
        journal.playing.insert(self.id);
        journal.max_concurrent = journal.max_concurrent.max(journal.playing.len());
        Ok(())
    }

    fn pause(&mut self) {
        let mut journal = self.journal.borrow_mut();
        journal.calls.push(AudioCall::Pause(self.source.clone()));
        journal.playing.remove(&self.id);
    }

    fn reset_position(&mut self) {
        self.journal
            .borrow_mut()
            .calls
            .push(AudioCall::Reset(self.source.clone()));
    }
}

/// An audio backend that can never load anything.
#[derive(Debug, Clone, Copy)]
pub struct FailingAudioBackend;

impl AudioBackend for FailingAudioBackend {
    fn load(&mut self, source: &str) -> Result<Box<dyn AudioChannel>, TourError> {
        Err(TourError::AudioPlayback(format!("cannot decode {source}")))
    }
}
