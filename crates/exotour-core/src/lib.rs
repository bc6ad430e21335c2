//! Exotour Core — shared ports and abstractions.
//!
//! This crate defines the traits and types every choreography component
//! depends on: the error taxonomy, the frame ticker, the signal envelope and
//! the narrow ports to external collaborators (storage, audio, scrolling,
//! navigation). It contains no rendering or platform code.

pub mod audio;
pub mod error;
pub mod event;
pub mod frame;
pub mod machine;
pub mod navigation;
pub mod pose;
pub mod scroll;
pub mod storage;
