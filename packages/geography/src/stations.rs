//! Station repository.
//!
//! [`StationSource`] is the seam the resolver depends on. The production
//! source is [`CsvStationSource`]; [`StaticStationSource`] injects a fixed
//! set for tests and embedding.

use std::path::{Path, PathBuf};

use iridm_geography_models::Station;

use crate::StationError;

/// Built-in stations used when no override file is present.
///
/// Illustrative sample data; replace with authoritative records via the
/// override CSV.
const DEFAULT_STATIONS: &[(&str, f64, f64, &str)] = &[
    ("Kengeri Fire Station", 12.9133, 77.4488, "+918022851049"),
    ("Ram Nagar Fire Station", 12.9225, 77.5051, "+918022917567"),
];

/// Returns the built-in station set.
#[must_use]
pub fn default_stations() -> Vec<Station> {
    DEFAULT_STATIONS
        .iter()
        .map(|&(name, lat, lon, phone)| Station::new(name, lat, lon, phone))
        .collect()
}

/// Supplies the candidate responder stations.
pub trait StationSource {
    /// Loads the station set. A successful result is never empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StationError`] if the underlying source is present but
    /// unreadable or malformed.
    fn load_stations(&self) -> Result<Vec<Station>, StationError>;
}

/// Reads stations from an override CSV when it exists, otherwise returns
/// the built-in defaults.
#[derive(Debug, Clone)]
pub struct CsvStationSource {
    path: PathBuf,
    defaults: Vec<Station>,
}

impl CsvStationSource {
    /// Creates a source backed by `path` with the built-in defaults.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: default_stations(),
        }
    }

    /// Replaces the fallback set used when the override file is absent.
    ///
    /// An empty `defaults` is ignored so the source can never return an
    /// empty set.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Vec<Station>) -> Self {
        if !defaults.is_empty() {
            self.defaults = defaults;
        }
        self
    }

    /// Path of the override file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StationSource for CsvStationSource {
    fn load_stations(&self) -> Result<Vec<Station>, StationError> {
        if !self.path.exists() {
            log::debug!(
                "No station override at {}, using {} built-in stations",
                self.path.display(),
                self.defaults.len()
            );
            return Ok(self.defaults.clone());
        }

        let stations = parse_station_csv(&self.path)?;
        log::info!(
            "Loaded {} stations from {}",
            stations.len(),
            self.path.display()
        );
        Ok(stations)
    }
}

/// A fixed, in-memory station set.
#[derive(Debug, Clone)]
pub struct StaticStationSource(pub Vec<Station>);

impl StationSource for StaticStationSource {
    fn load_stations(&self) -> Result<Vec<Station>, StationError> {
        if self.0.is_empty() {
            return Err(StationError::SourceMalformed {
                path: PathBuf::from("<static>"),
                line: 0,
                reason: "no stations configured".to_string(),
            });
        }
        Ok(self.0.clone())
    }
}

/// Parses and validates a station CSV with header
/// `name,latitude,longitude,phone`.
///
/// # Errors
///
/// Returns [`StationError::Io`] if the file cannot be opened and
/// [`StationError::SourceMalformed`] if any record fails to parse or
/// validate, or if the file holds no records.
pub fn parse_station_csv(path: &Path) -> Result<Vec<Station>, StationError> {
    let file = std::fs::File::open(path).map_err(|e| StationError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let malformed = |line: u64, reason: String| StationError::SourceMalformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let headers = reader
        .headers()
        .map_err(|e| malformed(1, e.to_string()))?
        .clone();

    let mut stations = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(|e| {
        let line = e.position().map_or(0, csv::Position::line);
        malformed(line, e.to_string())
    })? {
        let line = record.position().map_or(0, csv::Position::line);
        let station: Station = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(line, e.to_string()))?;
        station.validate().map_err(|reason| malformed(line, reason))?;
        stations.push(station);
    }

    if stations.is_empty() {
        return Err(malformed(1, "file contains no station records".to_string()));
    }

    Ok(stations)
}
