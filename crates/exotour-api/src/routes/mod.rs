//! Route modules.

pub mod exoplanets;
pub mod health;
pub mod stars;
