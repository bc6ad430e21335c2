//! Application layer for the Narrative context.

pub mod about_page;
pub mod guided_tour;
