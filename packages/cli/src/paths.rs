//! Default locations for runtime data.
//!
//! Everything lives under the workspace's `data/` directory unless
//! `IRIDM_DATA_DIR` says otherwise.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// current directory if the manifest sits less than two levels deep.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the default `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Station override CSV inside `data_dir`.
#[must_use]
pub fn stations_csv(data_dir: &Path) -> PathBuf {
    data_dir.join("fire_stations.csv")
}

/// Incident log CSV inside `data_dir`.
#[must_use]
pub fn incident_log(data_dir: &Path) -> PathBuf {
    data_dir.join("incident_log.csv")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
