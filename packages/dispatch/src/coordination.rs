//! Coordination protocol and follow-up rules for coordinated incidents.

use highway_ers_incident_models::{IncidentType, Priority, Service};
use serde::Serialize;

use crate::resolver::ServiceSelection;

/// Primary radio channel for all coordinated responses.
pub const PRIMARY_CHANNEL: &str = "Channel Alpha";

/// Backup radio channel.
pub const BACKUP_CHANNEL: &str = "Channel Beta";

/// Points every coordinated response works through.
pub const COORDINATION_POINTS: &[&str] = &[
    "Initial assessment and triage",
    "Resource allocation",
    "Scene security",
    "Evacuation procedures",
];

/// Who takes command of the scene for a given kind of emergency.
#[must_use]
pub const fn command_structure(incident_type: IncidentType) -> &'static str {
    match incident_type {
        IncidentType::Fire => "Fire Brigade Commander",
        IncidentType::Medical => "EMS Commander",
        IncidentType::Accident
        | IncidentType::Crime
        | IncidentType::Disaster
        | IncidentType::Other => "Police Commander",
    }
}

/// The coordination card shown next to a dispatch plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationProtocol {
    pub command: &'static str,
    pub primary_channel: &'static str,
    pub backup_channel: &'static str,
    pub coordination_points: &'static [&'static str],
}

impl CoordinationProtocol {
    #[must_use]
    pub const fn for_incident_type(incident_type: IncidentType) -> Self {
        Self {
            command: command_structure(incident_type),
            primary_channel: PRIMARY_CHANNEL,
            backup_channel: BACKUP_CHANNEL,
            coordination_points: COORDINATION_POINTS,
        }
    }
}

/// Dashboard to open once an incident is created: police first, then
/// EMS, then fire. `None` means the overview page.
#[must_use]
pub const fn landing_service(selection: ServiceSelection) -> Option<Service> {
    if selection.police {
        Some(Service::Police)
    } else if selection.ems {
        Some(Service::Ems)
    } else if selection.fire {
        Some(Service::Fire)
    } else {
        None
    }
}

/// SMS alert sent to the high authority contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityAlert {
    pub phone_numbers: Vec<String>,
    pub message: String,
    pub priority: Priority,
}

/// Builds the authority alert for a newly created incident, or `None`
/// when the priority does not warrant one.
#[must_use]
pub fn authority_alert(
    incident_type: IncidentType,
    priority: Priority,
    phone_numbers: &[String],
) -> Option<AuthorityAlert> {
    if !priority.requires_authority_alert() {
        return None;
    }

    Some(AuthorityAlert {
        phone_numbers: phone_numbers.to_vec(),
        message: format!(
            "HIGH PRIORITY EMERGENCY: {} incident reported. Immediate response required.",
            incident_type.as_ref().to_uppercase()
        ),
        priority,
    })
}
