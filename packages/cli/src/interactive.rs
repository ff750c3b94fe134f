//! Interactive report wizard.
//!
//! Menu-driven front end over [`Wizard`] and [`Session`] using
//! `dialoguer`. Loops until the user picks "Exit".

use dialoguer::{Confirm, Input, Select};
use iridm_wizard::{DisasterCategory, FireAssessment, FireLocation, Session, Wizard, WizardStep};

use crate::render;

/// Top-level actions in the interactive menu.
enum Action {
    ReportIncident,
    ShowStations,
    ShowLocations,
    ShowLog,
    ExportMap,
    Exit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ReportIncident,
        Self::ShowStations,
        Self::ShowLocations,
        Self::ShowLog,
        Self::ExportMap,
        Self::Exit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ReportIncident => "Report an incident",
            Self::ShowStations => "List fire stations",
            Self::ShowLocations => "List campus locations",
            Self::ShowLog => "Show incident log",
            Self::ExportMap => "Export campus map (GeoJSON)",
            Self::Exit => "Exit",
        }
    }
}

/// Runs the menu loop until the user exits, then tears the session down.
///
/// Failures inside an action are reported and the loop continues; only
/// terminal I/O errors end the session early.
///
/// # Errors
///
/// Returns an error if reading from the terminal fails.
pub fn run(mut session: Session) -> Result<(), Box<dyn std::error::Error>> {
    println!("IRIDM Disaster Management Assistant");
    println!("{}", session.campus().name);
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let mut last: Option<FireAssessment> = None;

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::ReportIncident => report_incident(&mut session, &mut last),
            Action::ShowStations => session
                .stations()
                .map(|stations| render::stations(&stations))
                .map_err(Into::into),
            Action::ShowLocations => {
                render::locations(session.campus());
                Ok(())
            }
            Action::ShowLog => {
                match session.log() {
                    Ok(log) => {
                        render::log(&log.newest_first(), None);
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Action::ExportMap => export_map(&session, last.as_ref()),
            Action::Exit => break,
        };

        if let Err(e) = result {
            log::error!("{e}");
            println!("Error: {e}");
        }
        println!();
    }

    let entries = session.teardown();
    println!("Session closed with {} logged entries.", entries.len());
    Ok(())
}

/// Walks the wizard from category selection through logging.
fn report_incident(
    session: &mut Session,
    last: &mut Option<FireAssessment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wizard = Wizard::new();

    let categories: Vec<&str> = DisasterCategory::ALL
        .iter()
        .map(DisasterCategory::label)
        .collect();
    let idx = Select::new()
        .with_prompt("Risk assessment category")
        .items(&categories)
        .default(0)
        .interact()?;
    let category = DisasterCategory::ALL[idx];
    wizard.choose_category(category)?;

    let incidents = category.incidents();
    let incident_labels: Vec<&str> = incidents.iter().map(|i| i.label()).collect();
    let idx = Select::new()
        .with_prompt("Type of incident")
        .items(&incident_labels)
        .default(0)
        .interact()?;

    if let WizardStep::Unsupported(incident) = wizard.choose_incident(incidents[idx])? {
        println!(
            "No workflow is available for {} yet. Contact campus security directly.",
            incident.label()
        );
        return Ok(());
    }

    let location = prompt_location(session)?;
    wizard.choose_location(session, &location)?;
    let Some(assessment) = wizard.assessment().cloned() else {
        return Ok(());
    };

    println!();
    render::assessment(&assessment);
    println!();

    if Confirm::new()
        .with_prompt(format!("Call {} now?", assessment.station.name))
        .default(true)
        .interact()?
    {
        println!("Dial {}", assessment.station.tel_uri());
        let notes = prompt_notes()?;
        render::record(session.log_call(&assessment, &notes))?;

        if Confirm::new()
            .with_prompt("Have responders arrived and the incident been resolved?")
            .default(false)
            .interact()?
        {
            let notes = prompt_notes()?;
            render::record(session.mark_resolved(&assessment, &notes))?;
        }
    }

    *last = Some(assessment);
    Ok(())
}

fn prompt_location(session: &Session) -> Result<FireLocation, dialoguer::Error> {
    let mut choices: Vec<String> = session
        .campus()
        .location_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    choices.push("Use my location (GPS)".to_string());

    let idx = Select::new()
        .with_prompt("Where is the fire?")
        .items(&choices)
        .default(0)
        .interact()?;

    Ok(if idx + 1 == choices.len() {
        FireLocation::Gps
    } else {
        FireLocation::Campus(choices[idx].clone())
    })
}

fn prompt_notes() -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt("Notes (optional)")
        .allow_empty(true)
        .interact_text()
}

fn export_map(
    session: &Session,
    last: Option<&FireAssessment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let highlight_evac = last.is_some_and(|a| a.campus_location.is_some())
        && Confirm::new()
            .with_prompt("Highlight the evacuation path?")
            .default(true)
            .interact()?;

    let path: String = Input::new()
        .with_prompt("Output file")
        .default("campus_map.geojson".to_string())
        .interact_text()?;

    let overlay = session.map_overlay(last, highlight_evac)?;
    std::fs::write(&path, overlay.to_geojson_string())?;
    println!("Wrote map overlay to {path}");
    Ok(())
}
