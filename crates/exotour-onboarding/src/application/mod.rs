//! Application layer for the Onboarding context.

pub mod tutorial;
