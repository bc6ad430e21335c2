//! Domain layer for the Scroll context.

pub mod autoscroll;
