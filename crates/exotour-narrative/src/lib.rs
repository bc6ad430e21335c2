//! Exotour — Narrative bounded context.
//!
//! Sequences narrated steps, plays their audio cues one at a time, schedules
//! their delayed stage effects on frame time, and hosts the guided home tour
//! that ties those together with the camera. The About page lives here too.

pub mod application;
pub mod domain;
