//! Exotour — Scroll bounded context.
//!
//! One driver serves both whole-page and container scrolling; only the
//! surface and the rate differ.

pub mod application;
pub mod domain;
