#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, fire station, and campus location types.
//!
//! These are plain value types shared by the station repository, the
//! nearest-station resolver, the map overlay and the wizard. They carry no
//! I/O and are immutable once loaded.

use serde::{Deserialize, Serialize};

/// A `(latitude, longitude)` pair in decimal degrees.
///
/// Serialized as a two-element `[lat, lon]` array so evacuation paths and
/// extinguisher positions read naturally in campus TOML files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    /// Latitude in decimal degrees (-90..=90).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180..=180).
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both components are finite and within range.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidCoordinateError`] describing the first
    /// component that is out of range.
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InvalidCoordinateError::Latitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InvalidCoordinateError::Longitude(self.longitude));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.latitude, c.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Error returned when a coordinate does not describe a real-world point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidCoordinateError {
    /// Latitude is non-finite or outside -90..=90.
    Latitude(f64),
    /// Longitude is non-finite or outside -180..=180.
    Longitude(f64),
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latitude(v) => write!(f, "invalid latitude {v}: expected -90..=90"),
            Self::Longitude(v) => write!(f, "invalid longitude {v}: expected -180..=180"),
        }
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// A fire-response facility. Field names match the station CSV header
/// (`name,latitude,longitude,phone`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station name (e.g. "Kengeri Fire Station").
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Dial-able phone number (e.g. "+918022851049").
    pub phone: String,
}

impl Station {
    /// Creates a station record.
    #[must_use]
    pub fn new(name: &str, latitude: f64, longitude: f64, phone: &str) -> Self {
        Self {
            name: name.to_owned(),
            latitude,
            longitude,
            phone: phone.to_owned(),
        }
    }

    /// Returns the station position.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Returns a `tel:` URI for the station phone number.
    #[must_use]
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.phone.replace(' ', ""))
    }

    /// Checks the station has a name and a valid position.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the record is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("station name is empty".to_string());
        }
        self.coordinate().validate().map_err(|e| e.to_string())
    }
}

/// A named incident-reportable place on campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusLocation {
    /// Location name as shown in the wizard (e.g. "Admin Block").
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Evacuation route waypoints, in walking order.
    #[serde(default)]
    pub evac_path: Vec<Coordinate>,
    /// Fire extinguisher positions near this location.
    #[serde(default)]
    pub extinguishers: Vec<Coordinate>,
}

impl CampusLocation {
    /// Returns the location position.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// The managed site: a centre point and its reportable locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    /// Campus name (e.g. "IRIDM Bengaluru").
    pub name: String,
    /// Approximate campus centroid. Used as the map view centre and as the
    /// fallback position for GPS reports.
    pub center: Coordinate,
    /// Reportable locations, in menu order.
    #[serde(default)]
    pub locations: Vec<CampusLocation>,
}

impl Campus {
    /// Looks up a location by exact name.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<&CampusLocation> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    /// Returns location names in menu order.
    #[must_use]
    pub fn location_names(&self) -> Vec<&str> {
        self.locations.iter().map(|loc| loc.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_validates_ranges() {
        assert!(Coordinate::new(12.9, 77.4).validate().is_ok());
        assert!(Coordinate::new(90.0, -180.0).validate().is_ok());
        assert_eq!(
            Coordinate::new(91.0, 0.0).validate(),
            Err(InvalidCoordinateError::Latitude(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, 180.5).validate(),
            Err(InvalidCoordinateError::Longitude(180.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn station_rejects_blank_name() {
        let station = Station::new("  ", 12.9, 77.4, "100");
        assert!(station.validate().is_err());
    }

    #[test]
    fn station_tel_uri_strips_spaces() {
        let station = Station::new("Kengeri", 12.9133, 77.4488, "+91 80 2285 1049");
        assert_eq!(station.tel_uri(), "tel:+918022851049");
    }

    #[test]
    fn campus_parses_coordinate_arrays() {
        let campus: Campus = toml::from_str(
            r#"
            name = "Test"
            center = [12.9076, 77.4329]

            [[locations]]
            name = "Admin Block"
            latitude = 12.9079
            longitude = 77.4332
            evac_path = [[12.9080, 77.4330], [12.9082, 77.4324]]
            "#,
        )
        .unwrap();

        let admin = campus.location("Admin Block").unwrap();
        assert_eq!(admin.evac_path.len(), 2);
        assert!((admin.evac_path[1].longitude - 77.4324).abs() < f64::EPSILON);
        assert!(admin.extinguishers.is_empty());
        assert!(campus.location("Library").is_none());
    }
}
