//! Built-in tour scripts, compiled into the binary.

use exotour_core::error::TourError;

use super::script_loader::parse_script;
use crate::domain::steps::StepTable;

const HOME_TOUR: &str = include_str!("../../scripts/home_tour.yaml");
const HWO_TUTORIAL: &str = include_str!("../../scripts/hwo_tutorial.yaml");
const ABOUT: &str = include_str!("../../scripts/about.yaml");

/// The narrated, camera-driven tour of the home scene.
///
/// # Errors
///
/// Returns `TourError::Validation` if the embedded script is invalid.
pub fn home_tour() -> Result<StepTable, TourError> {
    parse_script(HOME_TOUR)
}

/// The first-visit tutorial of the free-navigation view.
///
/// # Errors
///
/// Returns `TourError::Validation` if the embedded script is invalid.
pub fn hwo_tutorial() -> Result<StepTable, TourError> {
    parse_script(HWO_TUTORIAL)
}

/// The About page panels, one step per panel.
///
/// # Errors
///
/// Returns `TourError::Validation` if the embedded script is invalid.
pub fn about_panels() -> Result<StepTable, TourError> {
    parse_script(ABOUT)
}
