//! Exotour storage adapters.

pub mod json_file_store;
