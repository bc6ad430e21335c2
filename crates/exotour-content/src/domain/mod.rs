//! Domain layer for the Content context.

pub mod narration;
pub mod steps;
