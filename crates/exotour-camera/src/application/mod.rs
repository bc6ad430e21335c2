//! Application layer for the Camera context.

pub mod rig;
