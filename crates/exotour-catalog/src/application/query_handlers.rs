//! Query handlers for the Catalog context.
//!
//! These build the read-only view DTOs the detail pages render. Every field
//! the catalog lacks is rendered as "Unknown"; a missed lookup is a
//! `TourError::NotFound` the caller turns into a not-found page.

use exotour_core::error::TourError;
use exotour_core::navigation::Route;
use serde::Serialize;

use crate::domain::display::{self, DisplayValue};
use crate::domain::index::{CatalogIndex, StarGroup};
use crate::domain::records::{CatalogId, CatalogRecord};

/// One row of the star list.
#[derive(Debug, Serialize)]
pub struct StarSummaryView {
    /// Host star identifier.
    pub host: String,
    /// Number of catalogued planets.
    pub planet_count: usize,
    /// Spectral type.
    pub spectral_type: DisplayValue,
    /// Distance from Earth.
    pub distance: DisplayValue,
    /// Path of the star's detail page.
    pub detail_path: String,
}

/// A planet card on the star detail page.
#[derive(Debug, Serialize)]
pub struct PlanetCardView {
    /// Record id.
    pub id: CatalogId,
    /// Planet designation.
    pub name: String,
    /// Mass in Earth masses.
    pub mass: DisplayValue,
    /// Radius in Earth radii.
    pub radius: DisplayValue,
    /// Orbital period in days.
    pub orbital_period: DisplayValue,
    /// Path of the planet's detail page.
    pub detail_path: String,
}

/// The star detail page.
#[derive(Debug, Serialize)]
pub struct StarDetailsView {
    /// Host star identifier.
    pub host: String,
    /// Effective temperature.
    pub effective_temperature: DisplayValue,
    /// Stellar mass.
    pub mass: DisplayValue,
    /// Stellar radius.
    pub radius: DisplayValue,
    /// Metallicity.
    pub metallicity: DisplayValue,
    /// Distance from Earth.
    pub distance: DisplayValue,
    /// Spectral type.
    pub spectral_type: DisplayValue,
    /// Associated planets, in dataset order.
    pub planets: Vec<PlanetCardView>,
}

/// Bar values for the "comparison with Earth" panel.
///
/// Both bars read measured values: mass in Earth masses, radius in Earth
/// radii. The radius bar is not derived from mass.
#[derive(Debug, Serialize, PartialEq)]
pub struct EarthComparison {
    /// Mass bar fill, in percent, capped at 100.
    pub mass_percent: f64,
    /// Whether the mass is beyond the bar's range.
    pub exceeds_mass_scale: bool,
    /// Radius bar fill from the measured radius, in percent, capped at 100.
    pub radius_percent: f64,
    /// Whether the radius is beyond the bar's range.
    pub exceeds_radius_scale: bool,
}

/// The exoplanet detail page.
#[derive(Debug, Serialize)]
pub struct ExoplanetDetailsView {
    /// Record id.
    pub id: CatalogId,
    /// Planet designation.
    pub name: String,
    /// Minimum mass.
    pub minimum_mass: DisplayValue,
    /// Distance from the host star.
    pub orbital_distance: DisplayValue,
    /// Equilibrium temperature, Kelvin and Celsius.
    pub equilibrium_temperature: DisplayValue,
    /// Host star identifier.
    pub host: String,
    /// Host spectral type.
    pub host_spectral_type: DisplayValue,
    /// Distance from Earth.
    pub distance: DisplayValue,
    /// Host radius.
    pub star_radius: DisplayValue,
    /// Host luminosity.
    pub star_luminosity: DisplayValue,
    /// Host metallicity.
    pub star_metallicity: DisplayValue,
    /// "Yes" or "No".
    pub in_habitable_zone: &'static str,
    /// Earth comparison bars.
    pub earth_comparison: EarthComparison,
    /// Path back to the host star page.
    pub back_path: String,
}

/// Message a detail page shows when its lookup missed.
#[must_use]
pub fn not_found_message(error: &TourError) -> Option<&'static str> {
    match error {
        TourError::NotFound { entity: "star", .. } => Some("Star not found."),
        TourError::NotFound { .. } => Some("Exoplanet not found."),
        _ => None,
    }
}

fn bar(value: Option<f64>) -> (f64, bool) {
    let value = value.unwrap_or(0.0);
    (value.min(100.0), value > 100.0)
}

fn planet_card(record: &CatalogRecord) -> PlanetCardView {
    PlanetCardView {
        id: record.id,
        name: record.planet_name.clone(),
        mass: display::quantity(record.planet_mass(), "Earth Masses"),
        radius: display::quantity(record.planet_radius(), "Earth Radii"),
        orbital_period: display::quantity(record.orbital_period(), "days"),
        detail_path: Route::Exoplanet { id: record.id }.path(),
    }
}

fn star_summary(group: &StarGroup<'_>) -> StarSummaryView {
    let star = group.representative();
    StarSummaryView {
        host: group.host.to_owned(),
        planet_count: group.len(),
        spectral_type: display::text(star.spectral_type()),
        distance: display::distance(star.system_distance()),
        detail_path: Route::Star {
            host: group.host.to_owned(),
        }
        .path(),
    }
}

/// Lists every host star, ordered by identifier.
#[must_use]
pub fn list_stars(index: &CatalogIndex) -> Vec<StarSummaryView> {
    index.groups().map(|group| star_summary(&group)).collect()
}

/// Builds the detail page for `host`.
///
/// # Errors
///
/// Returns `TourError::NotFound` if the host is not in the catalog.
pub fn get_star_details(index: &CatalogIndex, host: &str) -> Result<StarDetailsView, TourError> {
    let group = index.group(host)?;
    let star = group.representative();
    Ok(StarDetailsView {
        host: group.host.to_owned(),
        effective_temperature: display::quantity(star.stellar_temperature(), "K"),
        mass: display::quantity(star.stellar_mass(), "Solar Masses"),
        radius: display::quantity(star.stellar_radius(), "Solar Radii"),
        metallicity: display::number(star.stellar_metallicity()),
        distance: display::distance(star.system_distance()),
        spectral_type: display::text(star.spectral_type()),
        planets: group.records.iter().map(|r| planet_card(r)).collect(),
    })
}

/// Builds the detail page for the record with `id`.
///
/// # Errors
///
/// Returns `TourError::NotFound` if no record has `id`.
pub fn get_exoplanet_details(
    index: &CatalogIndex,
    id: CatalogId,
) -> Result<ExoplanetDetailsView, TourError> {
    let planet = index.find_by_id(id)?;
    let (mass_percent, exceeds_mass_scale) = bar(planet.planet_mass());
    let (radius_percent, exceeds_radius_scale) = bar(planet.planet_radius());
    Ok(ExoplanetDetailsView {
        id: planet.id,
        name: planet.planet_name.clone(),
        minimum_mass: display::quantity(planet.planet_mass(), "Earth masses"),
        orbital_distance: display::quantity(planet.orbital_distance(), "AU"),
        equilibrium_temperature: display::temperature(planet.equilibrium_temperature()),
        host: planet.host.clone(),
        host_spectral_type: display::text(planet.spectral_type()),
        distance: display::distance(planet.system_distance()),
        star_radius: display::quantity(planet.stellar_radius(), "Solar radii"),
        star_luminosity: display::log_luminosity(planet.stellar_luminosity()),
        star_metallicity: display::number(planet.stellar_metallicity()),
        in_habitable_zone: if planet.in_habitable_zone() { "Yes" } else { "No" },
        earth_comparison: EarthComparison {
            mass_percent,
            exceeds_mass_scale,
            radius_percent,
            exceeds_radius_scale,
        },
        back_path: Route::Star {
            host: planet.host.clone(),
        }
        .path(),
    })
}
