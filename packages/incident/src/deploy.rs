//! Simulated unit deployment.
//!
//! Deploying only validates the selection against the service's roster
//! and records it in the log. Nothing is persisted.

use chrono::{DateTime, Utc};
use highway_ers_incident_models::{Incident, Service};
use serde::Serialize;

use crate::roster::deployable_units;

/// Errors that can occur when deploying units.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// The selection was empty.
    #[error("No units selected for incident {incident_id}")]
    NoUnitsSelected {
        /// Target incident.
        incident_id: String,
    },

    /// A unit is not on the service's roster.
    #[error("Unknown {service} unit: {unit}")]
    UnknownUnit {
        /// Service whose roster was checked.
        service: Service,
        /// The offending unit name.
        unit: String,
    },

    /// The same unit was selected twice.
    #[error("Unit selected more than once: {unit}")]
    DuplicateUnit {
        /// The repeated unit name.
        unit: String,
    },
}

/// A recorded deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub incident_id: String,
    pub service: Service,
    pub units: Vec<String>,
    pub deployed_at: DateTime<Utc>,
}

/// Deploys `units` of `service` to `incident`.
///
/// # Errors
///
/// Returns [`DeployError`] if no units are selected, a unit is not on the
/// service's roster, or a unit is selected twice.
pub fn deploy_units(
    incident: &Incident,
    service: Service,
    units: &[String],
) -> Result<Deployment, DeployError> {
    if units.is_empty() {
        return Err(DeployError::NoUnitsSelected {
            incident_id: incident.id.clone(),
        });
    }

    let roster = deployable_units(service);
    for (idx, unit) in units.iter().enumerate() {
        if !roster.contains(&unit.as_str()) {
            return Err(DeployError::UnknownUnit {
                service,
                unit: unit.clone(),
            });
        }
        if units[..idx].contains(unit) {
            return Err(DeployError::DuplicateUnit { unit: unit.clone() });
        }
    }

    log::info!(
        "Deploying {} unit(s) to incident {}: {}",
        service,
        incident.id,
        units.join(", ")
    );

    Ok(Deployment {
        incident_id: incident.id.clone(),
        service,
        units: units.to_vec(),
        deployed_at: Utc::now(),
    })
}
