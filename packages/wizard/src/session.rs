//! Per-user session state for the fire workflow.
//!
//! A [`Session`] owns the campus registry, the station source, the incident
//! log and the assumed response speed. It is created once per user session
//! and torn down at its end; nothing in it is shared between sessions.

use iridm_geography::stations::StationSource;
use iridm_geography_models::{Campus, CampusLocation, Coordinate, Station};
use iridm_incident::IncidentLog;
use iridm_incident_models::{GPS_LOCATION, IncidentStatus, LogEntry};
use iridm_map::MapOverlay;
use iridm_spatial::{ResponseSpeed, eta_minutes_at, nearest, rank};

use crate::SessionError;

/// Where the fire was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireLocation {
    /// A named campus location.
    Campus(String),
    /// The reporter's device position.
    Gps,
}

impl FireLocation {
    /// Label recorded in the incident log.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Campus(name) => name,
            Self::Gps => GPS_LOCATION,
        }
    }
}

/// A station and its distance from the incident point.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDistance {
    /// The station.
    pub station: Station,
    /// Rounded geodesic distance in kilometres.
    pub distance_km: f64,
}

/// Result of resolving a fire report against the station set.
#[derive(Debug, Clone, PartialEq)]
pub struct FireAssessment {
    /// Where the fire was reported.
    pub location: FireLocation,
    /// Incident point used for the distance calculation.
    pub point: Coordinate,
    /// The campus location, when one was chosen.
    pub campus_location: Option<CampusLocation>,
    /// The nearest station.
    pub station: Station,
    /// Distance to the nearest station in kilometres.
    pub distance_km: f64,
    /// Estimated travel time in whole minutes.
    pub eta_minutes: u32,
    /// Remaining stations, closest first.
    pub alternates: Vec<StationDistance>,
}

/// State held for one user session.
pub struct Session {
    campus: Campus,
    stations: Box<dyn StationSource>,
    log: IncidentLog,
    speed: ResponseSpeed,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("campus", &self.campus.name)
            .field("log", &self.log)
            .field("speed", &self.speed)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts a session, loading any persisted log history.
    ///
    /// A persisted log that cannot be read does not stop the session:
    /// station lookups and the map keep working, and the failure is logged
    /// as a warning. Log operations return the load error until the file is
    /// readable, so the unread history is never overwritten.
    #[must_use]
    pub fn init(
        campus: Campus,
        stations: impl StationSource + 'static,
        mut log: IncidentLog,
        speed: ResponseSpeed,
    ) -> Self {
        match log.load() {
            Ok(history) => log::info!(
                "Session started for '{}' with {} logged entries",
                campus.name,
                history.len()
            ),
            Err(e) => log::warn!(
                "Session started for '{}' without incident history: {e}",
                campus.name
            ),
        }

        Self {
            campus,
            stations: Box::new(stations),
            log,
            speed,
        }
    }

    #[must_use]
    pub const fn campus(&self) -> &Campus {
        &self.campus
    }

    #[must_use]
    pub const fn speed(&self) -> ResponseSpeed {
        self.speed
    }

    /// Loads the current station set from the session's source.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Stations`] if the source is unreadable or
    /// malformed.
    pub fn stations(&self) -> Result<Vec<Station>, SessionError> {
        Ok(self.stations.load_stations()?)
    }

    /// Resolves a reported location to a point and, for named locations,
    /// the campus entry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownLocation`] if the name is not in the
    /// campus registry.
    pub fn locate(
        &self,
        location: &FireLocation,
    ) -> Result<(Coordinate, Option<&CampusLocation>), SessionError> {
        match location {
            FireLocation::Campus(name) => {
                let found = self
                    .campus
                    .location(name)
                    .ok_or_else(|| SessionError::UnknownLocation(name.clone()))?;
                Ok((found.coordinate(), Some(found)))
            }
            FireLocation::Gps => {
                log::warn!(
                    "Device location is unavailable; using the {} campus centre {}",
                    self.campus.name,
                    self.campus.center
                );
                Ok((self.campus.center, None))
            }
        }
    }

    /// Finds the nearest station to the reported fire and estimates the
    /// response time.
    ///
    /// # Errors
    ///
    /// * [`SessionError::UnknownLocation`] for an unregistered name.
    /// * [`SessionError::Stations`] if the station source fails.
    /// * [`SessionError::Estimate`] if there are no stations.
    pub fn assess_fire(&self, location: &FireLocation) -> Result<FireAssessment, SessionError> {
        let (point, campus_location) = self.locate(location)?;
        let stations = self.stations()?;

        let best = nearest(point, &stations)?;
        let eta = eta_minutes_at(best.distance_km, self.speed)?;
        let station = best.station.clone();
        let distance_km = best.distance_km;

        let alternates = rank(point, &stations)
            .into_iter()
            .skip(1)
            .map(|r| StationDistance {
                station: r.station.clone(),
                distance_km: r.distance_km,
            })
            .collect();

        log::info!(
            "Fire at {}: nearest station {} is {distance_km} km away (~{eta} min)",
            location.label(),
            station.name
        );

        Ok(FireAssessment {
            location: location.clone(),
            point,
            campus_location: campus_location.cloned(),
            station,
            distance_km,
            eta_minutes: eta,
            alternates,
        })
    }

    /// Records that the nearest station was called for an assessed fire.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Log`] if the entry cannot be recorded. A
    /// persistence failure keeps the entry in the session log.
    pub fn log_call(
        &mut self,
        assessment: &FireAssessment,
        notes: &str,
    ) -> Result<LogEntry, SessionError> {
        Ok(self.log.append(
            IncidentStatus::CallPlaced,
            assessment.location.label(),
            notes,
        )?)
    }

    /// Records that an assessed fire was resolved.
    ///
    /// # Errors
    ///
    /// Same as [`log_call`](Self::log_call).
    pub fn mark_resolved(
        &mut self,
        assessment: &FireAssessment,
        notes: &str,
    ) -> Result<LogEntry, SessionError> {
        Ok(self.log.append(
            IncidentStatus::Resolved,
            assessment.location.label(),
            notes,
        )?)
    }

    /// The session's incident log.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Log`] if the persisted log could not be
    /// loaded.
    pub fn log(&mut self) -> Result<&IncidentLog, SessionError> {
        self.log.load()?;
        Ok(&self.log)
    }

    /// Builds the campus map, adding the assessed location's overlays when
    /// an assessment is given.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Stations`] if the station source fails.
    pub fn map_overlay(
        &self,
        assessment: Option<&FireAssessment>,
        highlight_evac: bool,
    ) -> Result<MapOverlay, SessionError> {
        let stations = self.stations()?;
        let selected = assessment.and_then(|a| a.campus_location.as_ref());
        Ok(MapOverlay::build(
            &self.campus,
            &stations,
            selected,
            highlight_evac,
        ))
    }

    /// Ends the session and hands back the session's log entries.
    #[must_use]
    pub fn teardown(self) -> Vec<LogEntry> {
        log::info!(
            "Session for '{}' ended with {} logged entries",
            self.campus.name,
            self.log.len()
        );
        self.log.into_entries()
    }
}
