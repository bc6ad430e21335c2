//! Exotour — Onboarding bounded context.
//!
//! A short tutorial shown once per persistence scope. No camera or audio
//! coupling: each step is narration plus an optional illustration.

pub mod application;
pub mod domain;
