//! Disaster categories and incident types offered by the wizard.
//!
//! Only man-made fire has a defined workflow. Every other incident type is
//! still selectable and resolves to [`Workflow::Unsupported`] so the
//! presentation layer can say so explicitly.

/// Top-level risk-assessment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisasterCategory {
    /// Natural hazards.
    Natural,
    /// Man-made incidents.
    ManMade,
    /// Technical failures.
    TechnicalFailure,
}

impl DisasterCategory {
    /// All categories in menu order.
    pub const ALL: &[Self] = &[Self::Natural, Self::ManMade, Self::TechnicalFailure];

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Natural => "Natural",
            Self::ManMade => "Man-made",
            Self::TechnicalFailure => "Technical Failure",
        }
    }

    /// Incident types offered under this category, in menu order.
    #[must_use]
    pub fn incidents(self) -> Vec<Incident> {
        match self {
            Self::Natural => NaturalIncident::ALL
                .iter()
                .copied()
                .map(Incident::Natural)
                .collect(),
            Self::ManMade => ManMadeIncident::ALL
                .iter()
                .copied()
                .map(Incident::ManMade)
                .collect(),
            Self::TechnicalFailure => TechnicalFailure::ALL
                .iter()
                .copied()
                .map(Incident::Technical)
                .collect(),
        }
    }
}

/// Natural incident types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalIncident {
    /// Flooding.
    Flood,
    /// Any other natural hazard.
    Other,
}

impl NaturalIncident {
    /// All variants in menu order.
    pub const ALL: &[Self] = &[Self::Flood, Self::Other];

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Other => "Other",
        }
    }
}

/// Man-made incident types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManMadeIncident {
    /// Fire on campus.
    Fire,
    /// Railway accident.
    TrainAccident,
    /// Building or structure collapse.
    InfrastructureCollapse,
    /// Machinery breakdown.
    MachineryBreakdown,
    /// Medical emergency.
    MedicalEmergency,
    /// Any other man-made incident.
    Other,
}

impl ManMadeIncident {
    /// All variants in menu order.
    pub const ALL: &[Self] = &[
        Self::Fire,
        Self::TrainAccident,
        Self::InfrastructureCollapse,
        Self::MachineryBreakdown,
        Self::MedicalEmergency,
        Self::Other,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::TrainAccident => "Train Accident",
            Self::InfrastructureCollapse => "Infrastructure Collapse",
            Self::MachineryBreakdown => "Machinery Breakdown",
            Self::MedicalEmergency => "Medical Emergency",
            Self::Other => "Other",
        }
    }
}

/// Technical failure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TechnicalFailure {
    /// IT systems down.
    ItSystemBreakdown,
    /// Power outage.
    PowerFailure,
    /// Transport accident involving trainees or staff.
    TransportationAccident,
}

impl TechnicalFailure {
    /// All variants in menu order.
    pub const ALL: &[Self] = &[
        Self::ItSystemBreakdown,
        Self::PowerFailure,
        Self::TransportationAccident,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ItSystemBreakdown => "IT System Breakdown",
            Self::PowerFailure => "Power Failure",
            Self::TransportationAccident => {
                "Transportation Accident involving Trainees and Staff"
            }
        }
    }
}

/// A specific incident type, tagged by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Incident {
    /// A natural incident.
    Natural(NaturalIncident),
    /// A man-made incident.
    ManMade(ManMadeIncident),
    /// A technical failure.
    Technical(TechnicalFailure),
}

impl Incident {
    /// The category this incident belongs to.
    #[must_use]
    pub const fn category(self) -> DisasterCategory {
        match self {
            Self::Natural(_) => DisasterCategory::Natural,
            Self::ManMade(_) => DisasterCategory::ManMade,
            Self::Technical(_) => DisasterCategory::TechnicalFailure,
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Natural(i) => i.label(),
            Self::ManMade(i) => i.label(),
            Self::Technical(i) => i.label(),
        }
    }

    /// The workflow that handles this incident.
    #[must_use]
    pub const fn workflow(self) -> Workflow {
        match self {
            Self::ManMade(ManMadeIncident::Fire) => Workflow::Fire,
            other => Workflow::Unsupported(other),
        }
    }
}

/// How the wizard proceeds once an incident type is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Locate the fire, resolve the nearest station, log actions.
    Fire,
    /// No workflow exists yet for this incident.
    Unsupported(Incident),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fire_has_a_workflow() {
        for category in DisasterCategory::ALL {
            for incident in category.incidents() {
                assert_eq!(incident.category(), *category);
                let expected = if incident == Incident::ManMade(ManMadeIncident::Fire) {
                    Workflow::Fire
                } else {
                    Workflow::Unsupported(incident)
                };
                assert_eq!(incident.workflow(), expected, "{}", incident.label());
            }
        }
    }

    #[test]
    fn menus_list_every_subtype() {
        assert_eq!(DisasterCategory::Natural.incidents().len(), 2);
        assert_eq!(DisasterCategory::ManMade.incidents().len(), 6);
        assert_eq!(DisasterCategory::TechnicalFailure.incidents().len(), 3);
        assert_eq!(DisasterCategory::ManMade.incidents()[0].label(), "Fire");
    }
}
