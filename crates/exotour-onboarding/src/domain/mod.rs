//! Domain layer for the Onboarding context.

pub mod signals;
pub mod wizard;
