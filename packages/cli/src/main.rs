#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the IRIDM incident reporting assistant.
//!
//! Each subcommand runs one step of the fire workflow against the
//! configured station source and incident log. Without a subcommand the
//! tool starts an interactive wizard.

mod config;
mod interactive;
mod paths;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use iridm_geography::campus::load_campus;
use iridm_geography::stations::CsvStationSource;
use iridm_incident::IncidentLog;
use iridm_wizard::{FireLocation, Session};

use crate::config::{AppConfig, Overrides};

#[derive(Parser)]
#[command(name = "iridm", about = "Campus fire incident reporting assistant")]
struct Cli {
    /// Directory holding `fire_stations.csv` and `incident_log.csv`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Station override CSV (`name,latitude,longitude,phone`)
    #[arg(long, global = true)]
    stations: Option<PathBuf>,
    /// Incident log CSV
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Campus definition TOML replacing the built-in campus
    #[arg(long, global = true)]
    campus: Option<PathBuf>,
    /// Average response speed in km/h used for ETA estimates
    #[arg(long, global = true)]
    speed: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the fire is. Exactly one of the two is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct LocationArgs {
    /// Campus location name (e.g. "Admin Block")
    #[arg(long)]
    location: Option<String>,
    /// Use the device position
    #[arg(long)]
    gps: bool,
}

impl LocationArgs {
    fn fire_location(&self) -> FireLocation {
        self.location
            .clone()
            .map_or(FireLocation::Gps, FireLocation::Campus)
    }
}

/// Optional fire location for the map.
#[derive(Args)]
#[group(required = false, multiple = false)]
struct MapLocationArgs {
    /// Campus location to highlight
    #[arg(long)]
    location: Option<String>,
    /// Highlight around the device position
    #[arg(long)]
    gps: bool,
}

impl MapLocationArgs {
    fn fire_location(&self) -> Option<FireLocation> {
        match (&self.location, self.gps) {
            (Some(name), _) => Some(FireLocation::Campus(name.clone())),
            (None, true) => Some(FireLocation::Gps),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured fire stations
    Stations,
    /// List campus locations
    Locations,
    /// Find the nearest fire station and estimate the response time
    Assess {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Record that the nearest fire station was called
    Call {
        #[command(flatten)]
        location: LocationArgs,
        /// Free-form notes for the log entry
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Record that the incident was resolved
    Resolve {
        #[command(flatten)]
        location: LocationArgs,
        /// Free-form notes for the log entry
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Show the incident log, most recent first
    Log {
        /// Maximum number of entries to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the campus map overlay as `GeoJSON`
    Map {
        #[command(flatten)]
        location: MapLocationArgs,
        /// Do not draw the evacuation path
        #[arg(long)]
        no_evac: bool,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Builds a session from resolved configuration.
///
/// # Errors
///
/// Returns an error if the campus override cannot be loaded or the data
/// directory cannot be created.
fn open_session(config: &AppConfig) -> Result<Session, Box<dyn std::error::Error>> {
    paths::ensure_dir(&config.data_dir)?;
    let campus = load_campus(config.campus_toml.as_deref())?;
    let stations = CsvStationSource::new(&config.stations_csv);
    let log = IncidentLog::new(&config.log_file);
    Ok(Session::init(campus, stations, log, config.speed))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = AppConfig::from_env(&Overrides {
        data_dir: cli.data_dir,
        stations_csv: cli.stations,
        log_file: cli.log_file,
        campus_toml: cli.campus,
        speed_kmph: cli.speed,
    })?;
    let mut session = open_session(&config)?;

    let Some(command) = cli.command else {
        return interactive::run(session);
    };

    match command {
        Commands::Stations => render::stations(&session.stations()?),
        Commands::Locations => render::locations(session.campus()),
        Commands::Assess { location } => {
            let assessment = session.assess_fire(&location.fire_location())?;
            render::assessment(&assessment);
        }
        Commands::Call { location, notes } => {
            let assessment = session.assess_fire(&location.fire_location())?;
            render::assessment(&assessment);
            println!();
            render::record(session.log_call(&assessment, &notes))?;
        }
        Commands::Resolve { location, notes } => {
            let assessment = session.assess_fire(&location.fire_location())?;
            render::record(session.mark_resolved(&assessment, &notes))?;
        }
        Commands::Log { limit } => render::log(&session.log()?.newest_first(), limit),
        Commands::Map {
            location,
            no_evac,
            output,
        } => {
            let assessment = location
                .fire_location()
                .map(|loc| session.assess_fire(&loc))
                .transpose()?;
            let overlay = session.map_overlay(assessment.as_ref(), !no_evac)?;
            let json = overlay.to_geojson_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Wrote map overlay to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    let _ = session.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_group() {
        let cli = Cli::try_parse_from(["iridm", "assess", "--location", "Hostel"]).unwrap();
        let Some(Commands::Assess { location }) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(
            location.fire_location(),
            FireLocation::Campus("Hostel".to_string())
        );

        let cli = Cli::try_parse_from(["iridm", "call", "--gps", "--notes", "smoke"]).unwrap();
        let Some(Commands::Call { location, notes }) = cli.command else {
            panic!("expected call");
        };
        assert_eq!(location.fire_location(), FireLocation::Gps);
        assert_eq!(notes, "smoke");
    }

    #[test]
    fn location_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["iridm", "assess"]).is_err());
        assert!(
            Cli::try_parse_from(["iridm", "resolve", "--gps", "--location", "Hostel"]).is_err()
        );
    }

    #[test]
    fn map_location_is_optional() {
        let cli = Cli::try_parse_from(["iridm", "map", "--no-evac"]).unwrap();
        let Some(Commands::Map {
            location, no_evac, ..
        }) = cli.command
        else {
            panic!("expected map");
        };
        assert!(no_evac);
        assert!(location.fire_location().is_none());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["iridm", "log", "--limit", "5", "--speed", "30"]).unwrap();
        assert_eq!(cli.speed, Some(30.0));
        assert!(matches!(cli.command, Some(Commands::Log { limit: Some(5) })));
    }

    #[test]
    fn opens_session_in_fresh_data_dir() {
        let dir = std::env::temp_dir().join("iridm_cli_open_session");
        let _ = std::fs::remove_dir_all(&dir);
        let config = AppConfig::resolve(
            |_| None,
            &Overrides {
                data_dir: Some(dir.clone()),
                ..Overrides::default()
            },
        )
        .unwrap();

        let mut session = open_session(&config).unwrap();
        assert!(dir.is_dir());
        // No override CSV yet, so the built-in stations apply.
        assert_eq!(session.stations().unwrap().len(), 2);
        assert!(session.log().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
