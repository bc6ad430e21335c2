//! Exotour — Catalog bounded context.
//!
//! Reshapes the flat per-observation dataset into the star → planets
//! structure consumed by the 3D scene and the detail views.

pub mod application;
pub mod domain;
