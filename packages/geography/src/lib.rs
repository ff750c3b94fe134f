#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fire station repository and campus location registry.
//!
//! Stations come from an optional override CSV
//! (`name,latitude,longitude,phone`) and fall back to a built-in set only
//! when the override is absent. A present-but-broken override is an error
//! and never falls back to the defaults.
//!
//! Campus geodata (locations, evacuation paths, extinguishers) is embedded
//! from `campus/iridm.toml` and can be replaced by a TOML file at runtime.

pub mod campus;
pub mod stations;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading station data.
#[derive(Debug, Error)]
pub enum StationError {
    /// The override source exists but could not be parsed or validated.
    #[error(
        "Station source {} is malformed at line {line}: {reason}",
        .path.display()
    )]
    SourceMalformed {
        /// Path to the override file.
        path: PathBuf,
        /// 1-based line number of the offending record (1 is the header).
        line: u64,
        /// Description of what went wrong.
        reason: String,
    },

    /// The override source exists but could not be read.
    #[error("Failed to read station source {}: {source}", .path.display())]
    Io {
        /// Path to the override file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that can occur while loading campus geodata.
#[derive(Debug, Error)]
pub enum CampusError {
    /// TOML parsing failed.
    #[error("Failed to parse campus definition '{name}': {source}")]
    Parse {
        /// File path or embedded definition name.
        name: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// The definition parsed but is not usable.
    #[error("Invalid campus definition '{name}': {reason}")]
    Invalid {
        /// File path or embedded definition name.
        name: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// The override file could not be read.
    #[error("Failed to read campus definition {}: {source}", .path.display())]
    Io {
        /// Path to the override file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
