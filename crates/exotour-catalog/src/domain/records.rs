//! Catalog records as they appear in the dataset.

use serde::{Deserialize, Serialize};

/// Stable integer identifier of a catalog record.
pub type CatalogId = u32;

/// One observation row: a planet and the star it orbits.
///
/// Field names on the wire follow the NASA Exoplanet Archive column names.
/// Every numeric field may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Unique across the dataset.
    pub id: CatalogId,
    /// Host star identifier.
    #[serde(rename = "hostname")]
    pub host: String,
    /// Planet designation.
    #[serde(rename = "pl_name")]
    pub planet_name: String,
    /// Planet mass (or minimum mass) in Earth masses.
    #[serde(rename = "pl_bmasse", default)]
    pub planet_mass: Option<f64>,
    /// Planet radius in Earth radii.
    #[serde(rename = "pl_rade", default)]
    pub planet_radius: Option<f64>,
    /// Orbital period in days.
    #[serde(rename = "pl_orbper", default)]
    pub orbital_period: Option<f64>,
    /// Orbit semi-major axis in AU.
    #[serde(rename = "pl_orbsmax", default)]
    pub orbital_distance: Option<f64>,
    /// Equilibrium temperature in Kelvin.
    #[serde(rename = "pl_eqt", default)]
    pub equilibrium_temperature: Option<f64>,
    /// Stellar effective temperature in Kelvin.
    #[serde(rename = "st_teff", default)]
    pub stellar_temperature: Option<f64>,
    /// Stellar mass in solar masses.
    #[serde(rename = "st_mass", default)]
    pub stellar_mass: Option<f64>,
    /// Stellar radius in solar radii.
    #[serde(rename = "st_rad", default)]
    pub stellar_radius: Option<f64>,
    /// Stellar metallicity, [Fe/H] in dex.
    #[serde(rename = "st_met", default)]
    pub stellar_metallicity: Option<f64>,
    /// Stellar luminosity, log10(L/Lsun).
    #[serde(rename = "st_lum", default)]
    pub stellar_luminosity: Option<f64>,
    /// Spectral type, e.g. "M1 V".
    #[serde(rename = "st_spectype", default)]
    pub spectral_type: Option<String>,
    /// Distance to the system in parsecs.
    #[serde(rename = "sy_dist", default)]
    pub system_distance: Option<f64>,
    /// 1 when the planet lies in the habitable zone.
    #[serde(rename = "inZh", default)]
    pub habitable_zone: Option<u8>,
}

/// Filters a raw numeric field: absent, zero and non-finite values all mean
/// "not measured".
#[must_use]
pub fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

impl CatalogRecord {
    /// Planet mass in Earth masses, if measured.
    #[must_use]
    pub fn planet_mass(&self) -> Option<f64> {
        measured(self.planet_mass)
    }

    /// Planet radius in Earth radii, if measured.
    #[must_use]
    pub fn planet_radius(&self) -> Option<f64> {
        measured(self.planet_radius)
    }

    /// Orbital period in days, if measured.
    #[must_use]
    pub fn orbital_period(&self) -> Option<f64> {
        measured(self.orbital_period)
    }

    /// Orbital distance in AU, if measured.
    #[must_use]
    pub fn orbital_distance(&self) -> Option<f64> {
        measured(self.orbital_distance)
    }

    /// Equilibrium temperature in Kelvin, if measured.
    #[must_use]
    pub fn equilibrium_temperature(&self) -> Option<f64> {
        measured(self.equilibrium_temperature)
    }

    /// Stellar effective temperature in Kelvin, if measured.
    #[must_use]
    pub fn stellar_temperature(&self) -> Option<f64> {
        measured(self.stellar_temperature)
    }

    /// Stellar mass in solar masses, if measured.
    #[must_use]
    pub fn stellar_mass(&self) -> Option<f64> {
        measured(self.stellar_mass)
    }

    /// Stellar radius in solar radii, if measured.
    #[must_use]
    pub fn stellar_radius(&self) -> Option<f64> {
        measured(self.stellar_radius)
    }

    /// Stellar metallicity. Zero is solar metallicity, a real measurement,
    /// so only absence counts as unknown.
    #[must_use]
    pub fn stellar_metallicity(&self) -> Option<f64> {
        self.stellar_metallicity.filter(|v| v.is_finite())
    }

    /// Stellar log-luminosity, if measured.
    #[must_use]
    pub fn stellar_luminosity(&self) -> Option<f64> {
        measured(self.stellar_luminosity)
    }

    /// Spectral type, if catalogued.
    #[must_use]
    pub fn spectral_type(&self) -> Option<&str> {
        self.spectral_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// System distance in parsecs, if measured.
    #[must_use]
    pub fn system_distance(&self) -> Option<f64> {
        measured(self.system_distance)
    }

    /// Whether the planet lies in the habitable zone. Absent means no.
    #[must_use]
    pub fn in_habitable_zone(&self) -> bool {
        self.habitable_zone == Some(1)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{CatalogId, CatalogRecord};

    /// A record with only the identifying fields set.
    pub(crate) fn record(id: CatalogId, host: &str, planet: &str) -> CatalogRecord {
        CatalogRecord {
            id,
            host: host.to_owned(),
            planet_name: planet.to_owned(),
            planet_mass: None,
            planet_radius: None,
            orbital_period: None,
            orbital_distance: None,
            equilibrium_temperature: None,
            stellar_temperature: None,
            stellar_mass: None,
            stellar_radius: None,
            stellar_metallicity: None,
            stellar_luminosity: None,
            spectral_type: None,
            system_distance: None,
            habitable_zone: None,
        }
    }
}
