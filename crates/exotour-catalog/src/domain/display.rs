//! Display derivations: unit conversions and the "Unknown" fallback.
//!
//! Derived values are computed on read; nothing here is stored back on the
//! record.

use std::fmt;

use serde::{Serialize, Serializer};

/// Light-years per parsec, as rounded for display.
pub const LIGHT_YEARS_PER_PARSEC: f64 = 3.26;

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Text shown for any field the catalog does not provide.
pub const UNKNOWN: &str = "Unknown";

/// A rendered field: either a formatted value or the unknown marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    /// A formatted, measured value.
    Known(String),
    /// The field is missing from the catalog.
    Unknown,
}

impl DisplayValue {
    /// Formats `value` with `render`, or yields `Unknown` when absent.
    pub fn from_option<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> Self {
        value.map_or(Self::Unknown, |v| Self::Known(render(v)))
    }

    /// Whether the field is missing.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(text) => f.write_str(text),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for DisplayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts parsecs to light-years.
#[must_use]
pub fn parsecs_to_light_years(parsecs: f64) -> f64 {
    parsecs * LIGHT_YEARS_PER_PARSEC
}

/// Converts Kelvin to degrees Celsius.
#[must_use]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// `"<value> <unit>"`, or unknown.
#[must_use]
pub fn quantity(value: Option<f64>, unit: &str) -> DisplayValue {
    DisplayValue::from_option(value, |v| format!("{v} {unit}"))
}

/// Plain number, or unknown.
#[must_use]
pub fn number(value: Option<f64>) -> DisplayValue {
    DisplayValue::from_option(value, |v| v.to_string())
}

/// `"12.43 parsecs (~40.52 light-years)"`, or unknown.
#[must_use]
pub fn distance(parsecs: Option<f64>) -> DisplayValue {
    DisplayValue::from_option(parsecs, |pc| {
        format!(
            "{pc:.2} parsecs (~{:.2} light-years)",
            parsecs_to_light_years(pc)
        )
    })
}

/// `"249.7 K (~-23.45 °C)"`, or unknown.
#[must_use]
pub fn temperature(kelvin: Option<f64>) -> DisplayValue {
    DisplayValue::from_option(kelvin, |k| {
        format!("{k} K (~{:.2} °C)", kelvin_to_celsius(k))
    })
}

/// `"Log(Lum) = -2.1"`, or unknown.
#[must_use]
pub fn log_luminosity(value: Option<f64>) -> DisplayValue {
    DisplayValue::from_option(value, |v| format!("Log(Lum) = {v}"))
}

/// Text, or unknown.
#[must_use]
pub fn text(value: Option<&str>) -> DisplayValue {
    DisplayValue::from_option(value, str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_shows_parsecs_and_light_years() {
        assert_eq!(
            distance(Some(10.0)).to_string(),
            "10.00 parsecs (~32.60 light-years)"
        );
    }

    #[test]
    fn test_temperature_shows_kelvin_and_celsius() {
        assert_eq!(temperature(Some(300.0)).to_string(), "300 K (~26.85 °C)");
    }

    #[test]
    fn test_missing_values_render_unknown() {
        assert_eq!(distance(None).to_string(), UNKNOWN);
        assert_eq!(quantity(None, "AU").to_string(), UNKNOWN);
        assert!(text(None).is_unknown());
    }

    #[test]
    fn test_display_value_serializes_as_string() {
        let json = serde_json::to_value(quantity(Some(1.5), "Earth Masses")).unwrap();
        assert_eq!(json, serde_json::json!("1.5 Earth Masses"));

        let json = serde_json::to_value(DisplayValue::Unknown).unwrap();
        assert_eq!(json, serde_json::json!("Unknown"));
    }
}
