//! Domain layer for the Catalog context.

pub mod display;
pub mod index;
pub mod records;
