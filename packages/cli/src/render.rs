//! Plain-text output for stations, assessments and the incident log.

use iridm_geography_models::{Campus, Station};
use iridm_incident_models::LogEntry;
use iridm_wizard::{FireAssessment, SessionError};

pub fn stations(stations: &[Station]) {
    println!("{:<28} {:>9} {:>9}  PHONE", "NAME", "LAT", "LON");
    println!("{}", "-".repeat(66));
    for station in stations {
        println!(
            "{:<28} {:>9.4} {:>9.4}  {}",
            station.name, station.latitude, station.longitude, station.phone
        );
    }
}

pub fn locations(campus: &Campus) {
    println!("{} (centre {})", campus.name, campus.center);
    println!("{}", "-".repeat(50));
    for location in &campus.locations {
        println!(
            "{:<20} {}  evac waypoints: {}  extinguishers: {}",
            location.name,
            location.coordinate(),
            location.evac_path.len(),
            location.extinguishers.len()
        );
    }
}

pub fn assessment(assessment: &FireAssessment) {
    println!("Fire location:    {} {}", assessment.location.label(), assessment.point);
    println!("Nearest station:  {}", assessment.station.name);
    println!("Distance:         {:.2} km", assessment.distance_km);
    println!("Estimated ETA:    {} min", assessment.eta_minutes);
    println!("Call:             {}", assessment.station.tel_uri());

    if !assessment.alternates.is_empty() {
        println!();
        println!("Other stations:");
        for alt in &assessment.alternates {
            println!("  {:<28} {:>6.2} km", alt.station.name, alt.distance_km);
        }
    }
}

/// Prints the journal, most recent first, at most `limit` rows.
pub fn log(entries: &[LogEntry], limit: Option<usize>) {
    if entries.is_empty() {
        println!("No incidents logged.");
        return;
    }

    println!("{:<20} {:<12} {:<20} NOTES", "TIMESTAMP", "STATUS", "LOCATION");
    println!("{}", "-".repeat(70));
    for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<20} {:<12} {:<20} {}",
            entry.timestamp_string(),
            entry.status.as_ref(),
            entry.location,
            entry.notes
        );
    }
}

/// Reports the outcome of a log append. A failed write keeps the entry in
/// the session, so it is shown as a warning instead of an error.
///
/// # Errors
///
/// Returns every other [`SessionError`] unchanged.
pub fn record(result: Result<LogEntry, SessionError>) -> Result<(), SessionError> {
    match result {
        Ok(entry) => {
            println!(
                "Logged {} for {} at {}",
                entry.status,
                entry.location,
                entry.timestamp_string()
            );
            Ok(())
        }
        Err(SessionError::Log(e)) if e.is_recoverable() => {
            log::warn!("{e}");
            println!("Warning: {e}. The entry is kept for this session.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
