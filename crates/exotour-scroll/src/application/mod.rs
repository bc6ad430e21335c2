//! Application layer for the Scroll context.

pub mod session;
