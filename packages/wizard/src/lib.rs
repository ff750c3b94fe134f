#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident report wizard.
//!
//! The wizard walks a user from a disaster category to an incident type
//! and, for fires, to a location and the nearest station. [`Session`] holds
//! the per-user state the wizard acts on: the campus, the station source,
//! the incident log and the response speed.

pub mod incident;
pub mod machine;
pub mod session;

pub use incident::{DisasterCategory, Incident, Workflow};
pub use machine::{Wizard, WizardStep};
pub use session::{FireAssessment, FireLocation, Session, StationDistance};

use iridm_geography::StationError;
use iridm_incident::LogError;
use iridm_spatial::EstimateError;
use thiserror::Error;

/// Errors raised while serving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The named location is not in the campus registry.
    #[error("Unknown campus location '{0}'")]
    UnknownLocation(String),

    /// The station source could not be loaded.
    #[error(transparent)]
    Stations(#[from] StationError),

    /// No station could be resolved or the ETA could not be computed.
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    /// The incident log rejected or failed to persist an entry.
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Errors raised by the wizard state machine.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The action is not allowed at the current step.
    #[error("Cannot {action} at step '{step}'")]
    InvalidTransition {
        /// Name of the current step.
        step: &'static str,
        /// The attempted action.
        action: &'static str,
    },

    /// The incident does not belong to the chosen category.
    #[error("{} is not a {} incident", .incident.label(), .category.label())]
    CategoryMismatch {
        /// Category chosen earlier.
        category: DisasterCategory,
        /// Incident that was offered.
        incident: Incident,
    },

    /// The session failed while serving the step.
    #[error(transparent)]
    Session(#[from] SessionError),
}
