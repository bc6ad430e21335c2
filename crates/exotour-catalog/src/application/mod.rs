//! Application layer for the Catalog context.

pub mod loader;
pub mod query_handlers;
