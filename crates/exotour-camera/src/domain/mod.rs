//! Domain layer for the Camera context.

pub mod director;
