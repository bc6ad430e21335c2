//! Exotour — Content bounded context.
//!
//! Tour scripts are data: an ordered table of step descriptors that the
//! sequencers interpret uniformly. Adding or removing a step is an edit to a
//! script, not to sequencing logic.

pub mod application;
pub mod domain;
