//! Report wizard state machine.
//!
//! ```text
//! SelectCategory -> SelectIncident(category) -> SelectFireLocation
//!                                            -> Unsupported(incident)
//! SelectFireLocation -> Assessed(assessment) -> Assessed(assessment)
//! ```
//!
//! Any step can return to `SelectCategory` through [`Wizard::reset`].

use crate::WizardError;
use crate::incident::{DisasterCategory, Incident, Workflow};
use crate::session::{FireAssessment, FireLocation, Session};

/// Current wizard step.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    /// Choose a disaster category.
    SelectCategory,
    /// Choose an incident type within the category.
    SelectIncident(DisasterCategory),
    /// Fire workflow: choose where the fire is.
    SelectFireLocation,
    /// The chosen incident has no workflow.
    Unsupported(Incident),
    /// Fire workflow: nearest station resolved.
    Assessed(Box<FireAssessment>),
}

impl WizardStep {
    /// Short name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectCategory => "select-category",
            Self::SelectIncident(_) => "select-incident",
            Self::SelectFireLocation => "select-fire-location",
            Self::Unsupported(_) => "unsupported",
            Self::Assessed(_) => "assessed",
        }
    }
}

/// Drives one pass through the report wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: WizardStep::SelectCategory,
        }
    }

    #[must_use]
    pub const fn step(&self) -> &WizardStep {
        &self.step
    }

    /// The current assessment, once the fire workflow has reached it.
    #[must_use]
    pub fn assessment(&self) -> Option<&FireAssessment> {
        match &self.step {
            WizardStep::Assessed(assessment) => Some(&**assessment),
            _ => None,
        }
    }

    /// Returns to the first step.
    pub fn reset(&mut self) {
        log::debug!("Wizard reset from {}", self.step.name());
        self.step = WizardStep::SelectCategory;
    }

    /// Chooses the disaster category.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] unless the wizard is at
    /// [`WizardStep::SelectCategory`].
    pub fn choose_category(&mut self, category: DisasterCategory) -> Result<&WizardStep, WizardError> {
        if self.step != WizardStep::SelectCategory {
            return Err(self.invalid("choose category"));
        }
        self.step = WizardStep::SelectIncident(category);
        Ok(&self.step)
    }

    /// Chooses the incident type. Fire moves on to location selection;
    /// everything else lands on [`WizardStep::Unsupported`].
    ///
    /// # Errors
    ///
    /// * [`WizardError::InvalidTransition`] outside
    ///   [`WizardStep::SelectIncident`].
    /// * [`WizardError::CategoryMismatch`] if `incident` belongs to a
    ///   different category than the one chosen.
    pub fn choose_incident(&mut self, incident: Incident) -> Result<&WizardStep, WizardError> {
        let WizardStep::SelectIncident(category) = self.step else {
            return Err(self.invalid("choose incident"));
        };
        if incident.category() != category {
            return Err(WizardError::CategoryMismatch { category, incident });
        }

        self.step = match incident.workflow() {
            Workflow::Fire => WizardStep::SelectFireLocation,
            Workflow::Unsupported(incident) => {
                log::info!("No workflow for {}", incident.label());
                WizardStep::Unsupported(incident)
            }
        };
        Ok(&self.step)
    }

    /// Chooses the fire location and resolves the nearest station. Allowed
    /// again after an assessment to pick a different location.
    ///
    /// # Errors
    ///
    /// * [`WizardError::InvalidTransition`] outside the fire workflow.
    /// * [`WizardError::Session`] if the assessment fails; the step is left
    ///   unchanged.
    pub fn choose_location(
        &mut self,
        session: &Session,
        location: &FireLocation,
    ) -> Result<&WizardStep, WizardError> {
        if !matches!(
            self.step,
            WizardStep::SelectFireLocation | WizardStep::Assessed(_)
        ) {
            return Err(self.invalid("choose location"));
        }

        let assessment = session.assess_fire(location)?;
        self.step = WizardStep::Assessed(Box::new(assessment));
        Ok(&self.step)
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            step: self.step.name(),
            action,
        }
    }
}
