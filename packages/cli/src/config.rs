//! Runtime configuration.
//!
//! Values resolve in order: command-line flag, environment variable,
//! built-in default.

use std::path::PathBuf;

use iridm_spatial::{EstimateError, ResponseSpeed};
use thiserror::Error;

use crate::paths;

/// Data directory holding the station override and incident log.
pub const DATA_DIR_VAR: &str = "IRIDM_DATA_DIR";
/// Station override CSV.
pub const STATIONS_CSV_VAR: &str = "IRIDM_STATIONS_CSV";
/// Incident log CSV.
pub const LOG_FILE_VAR: &str = "IRIDM_LOG_FILE";
/// Campus definition override (TOML).
pub const CAMPUS_TOML_VAR: &str = "IRIDM_CAMPUS_TOML";
/// Average response speed in km/h.
pub const SPEED_VAR: &str = "IRIDM_SPEED_KMPH";

/// Errors from resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("{var} must be a number, got '{value}'")]
    NotANumber {
        /// Variable or flag name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// The response speed is not usable.
    #[error(transparent)]
    Speed(#[from] EstimateError),
}

/// Values supplied on the command line. `None` defers to the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub stations_csv: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub campus_toml: Option<PathBuf>,
    pub speed_kmph: Option<f64>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub stations_csv: PathBuf,
    pub log_file: PathBuf,
    pub campus_toml: Option<PathBuf>,
    pub speed: ResponseSpeed,
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the speed is not a positive number.
    pub fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolves configuration using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the speed is not a positive number.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let path_var = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        let data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| path_var(DATA_DIR_VAR))
            .unwrap_or_else(paths::data_dir);
        let stations_csv = overrides
            .stations_csv
            .clone()
            .or_else(|| path_var(STATIONS_CSV_VAR))
            .unwrap_or_else(|| paths::stations_csv(&data_dir));
        let log_file = overrides
            .log_file
            .clone()
            .or_else(|| path_var(LOG_FILE_VAR))
            .unwrap_or_else(|| paths::incident_log(&data_dir));
        let campus_toml = overrides
            .campus_toml
            .clone()
            .or_else(|| path_var(CAMPUS_TOML_VAR));

        let speed = match overrides.speed_kmph {
            Some(kmph) => ResponseSpeed::new(kmph)?,
            None => match lookup(SPEED_VAR) {
                Some(raw) if !raw.trim().is_empty() => {
                    let kmph = raw
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| ConfigError::NotANumber {
                            var: SPEED_VAR,
                            value: raw.clone(),
                        })?;
                    ResponseSpeed::new(kmph)?
                }
                _ => ResponseSpeed::default(),
            },
        };

        log::debug!(
            "Config: data={} stations={} log={} speed={} km/h",
            data_dir.display(),
            stations_csv.display(),
            log_file.display(),
            speed.kmph()
        );

        Ok(Self {
            data_dir,
            stations_csv,
            log_file,
            campus_toml,
            speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_follow_data_dir() {
        let config = AppConfig::resolve(env(&[("IRIDM_DATA_DIR", "/srv/iridm")]), &Overrides::default())
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/iridm"));
        assert_eq!(config.stations_csv, PathBuf::from("/srv/iridm/fire_stations.csv"));
        assert_eq!(config.log_file, PathBuf::from("/srv/iridm/incident_log.csv"));
        assert_eq!(config.campus_toml, None);
        assert_eq!(config.speed, ResponseSpeed::default());
    }

    #[test]
    fn flags_beat_environment() {
        let overrides = Overrides {
            log_file: Some(PathBuf::from("/tmp/flag.csv")),
            speed_kmph: Some(60.0),
            ..Overrides::default()
        };
        let config = AppConfig::resolve(
            env(&[
                ("IRIDM_LOG_FILE", "/tmp/env.csv"),
                ("IRIDM_SPEED_KMPH", "30"),
                ("IRIDM_CAMPUS_TOML", "/etc/campus.toml"),
            ]),
            &overrides,
        )
        .unwrap();
        assert_eq!(config.log_file, PathBuf::from("/tmp/flag.csv"));
        assert!((config.speed.kmph() - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.campus_toml, Some(PathBuf::from("/etc/campus.toml")));
    }

    #[test]
    fn reads_speed_from_environment() {
        let config =
            AppConfig::resolve(env(&[("IRIDM_SPEED_KMPH", " 25.5 ")]), &Overrides::default())
                .unwrap();
        assert!((config.speed.kmph() - 25.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_speed() {
        assert!(matches!(
            AppConfig::resolve(env(&[("IRIDM_SPEED_KMPH", "fast")]), &Overrides::default()),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            AppConfig::resolve(env(&[("IRIDM_SPEED_KMPH", "0")]), &Overrides::default()),
            Err(ConfigError::Speed(EstimateError::InvalidSpeed(_)))
        ));
        let overrides = Overrides {
            speed_kmph: Some(-5.0),
            ..Overrides::default()
        };
        assert!(AppConfig::resolve(env(&[]), &overrides).is_err());
    }
}
