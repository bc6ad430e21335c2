//! Player configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::PlayerError;

/// Player settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Optional catalog to summarise when free navigation opens.
    pub catalog_path: Option<PathBuf>,
    /// Optional YAML script replacing the built-in home tour.
    pub tour_script: Option<PathBuf>,
    /// Directory holding the persistent state file.
    pub state_dir: PathBuf,
    /// Frames per second of the frame loop.
    pub frame_rate: u32,
    /// Advance automatically at this interval instead of reading stdin.
    pub auto_advance: Option<Duration>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            tour_script: None,
            state_dir: PathBuf::from(".exotour"),
            frame_rate: 60,
            auto_advance: None,
        }
    }
}

impl PlayerConfig {
    /// Reads `CATALOG_PATH`, `TOUR_SCRIPT`, `STATE_DIR`, `FRAME_RATE` and
    /// `AUTO_ADVANCE_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Config` if a numeric variable does not parse or
    /// is out of range.
    pub fn from_env() -> Result<Self, PlayerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`PlayerConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Config` if a numeric variable does not parse or
    /// is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlayerError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let frame_rate = match non_empty("FRAME_RATE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|rate| (1..=1000).contains(rate))
                .ok_or_else(|| {
                    PlayerError::Config(format!("FRAME_RATE must be 1..=1000, got {raw:?}"))
                })?,
            None => defaults.frame_rate,
        };

        let auto_advance = non_empty("AUTO_ADVANCE_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|secs| *secs > 0.0)
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .ok_or_else(|| {
                        PlayerError::Config(format!(
                            "AUTO_ADVANCE_SECS must be a positive number, got {raw:?}"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self {
            catalog_path: non_empty("CATALOG_PATH").map(PathBuf::from),
            tour_script: non_empty("TOUR_SCRIPT").map(PathBuf::from),
            state_dir: non_empty("STATE_DIR").map_or(defaults.state_dir, PathBuf::from),
            frame_rate,
            auto_advance,
        })
    }

    /// Wall-clock time between frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<PlayerConfig, PlayerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        PlayerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config(&[]).unwrap();

        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_reads_every_variable() {
        // Act
        let config = config(&[
            ("CATALOG_PATH", "data/catalog.json"),
            ("TOUR_SCRIPT", "tour.yaml"),
            ("STATE_DIR", "/tmp/state"),
            ("FRAME_RATE", "30"),
            ("AUTO_ADVANCE_SECS", "2.5"),
        ])
        .unwrap();

        // Assert
        assert_eq!(config.catalog_path, Some(PathBuf::from("data/catalog.json")));
        assert_eq!(config.tour_script, Some(PathBuf::from("tour.yaml")));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.auto_advance, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_zero_frame_rate_is_rejected() {
        let result = config(&[("FRAME_RATE", "0")]);

        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn test_negative_auto_advance_is_rejected() {
        let result = config(&[("AUTO_ADVANCE_SECS", "-1")]);

        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn test_unrepresentable_auto_advance_is_rejected() {
        for raw in ["1e30", "inf", "NaN"] {
            let result = config(&[("AUTO_ADVANCE_SECS", raw)]);

            assert!(matches!(result, Err(PlayerError::Config(_))), "{raw}");
        }
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config(&[("STATE_DIR", "  "), ("CATALOG_PATH", "")]).unwrap();

        assert_eq!(config.state_dir, PathBuf::from(".exotour"));
        assert!(config.catalog_path.is_none());
    }
}
