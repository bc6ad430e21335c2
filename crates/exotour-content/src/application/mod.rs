//! Application layer for the Content context.

pub mod builtin;
pub mod script_loader;
