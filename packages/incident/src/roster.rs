//! Deployable units and the police resource panel.

use highway_ers_incident_models::Service;
use serde::Serialize;

/// Units that can be deployed to an incident, per service.
#[must_use]
pub const fn deployable_units(service: Service) -> &'static [&'static str] {
    match service {
        Service::Police => &[
            "Patrol Unit 1",
            "Patrol Unit 2",
            "Patrol Unit 3",
            "Highway Patrol 1",
            "Highway Patrol 2",
            "K-9 Unit 1",
            "SWAT Team",
        ],
        Service::Ems => &[
            "Ambulance 1",
            "Ambulance 2",
            "Ambulance 3",
            "Paramedic Unit 1",
            "Paramedic Unit 2",
            "Medical Helicopter",
            "Trauma Team",
        ],
        Service::Fire => &[
            "Engine 1",
            "Engine 2",
            "Engine 3",
            "Tanker 1",
            "Tanker 2",
            "Ladder 1",
            "Brush Unit 1",
        ],
    }
}

/// Duty status of a unit or checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Available,
    OnDuty,
    Responding,
    OnBreak,
    OnStandby,
    /// Checkpoints that are manned.
    Active,
}

impl UnitStatus {
    /// Whether a resource in this status counts as available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available | Self::Active)
    }
}

/// One entry of the resource panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: &'static str,
    pub name: &'static str,
    pub status: UnitStatus,
    pub location: &'static str,
}

/// A titled group of resources (e.g. "Patrol Units").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroup {
    pub title: &'static str,
    pub resources: Vec<Resource>,
}

impl ResourceGroup {
    /// Returns `(available, total)` for the group badge.
    #[must_use]
    pub fn availability(&self) -> (usize, usize) {
        let available = self
            .resources
            .iter()
            .filter(|r| r.status.is_available())
            .count();
        (available, self.resources.len())
    }
}

const fn resource(
    id: &'static str,
    name: &'static str,
    status: UnitStatus,
    location: &'static str,
) -> Resource {
    Resource {
        id,
        name,
        status,
        location,
    }
}

/// Resources shown on the police dashboard's resource panel.
#[must_use]
pub fn police_resources() -> Vec<ResourceGroup> {
    use UnitStatus::{Active, Available, OnBreak, OnDuty, OnStandby, Responding};

    vec![
        ResourceGroup {
            title: "Patrol Units",
            resources: vec![
                resource("PU-1", "Patrol Unit 1", Available, "Highway 101, Mile 30"),
                resource("PU-2", "Patrol Unit 2", OnDuty, "Highway 5, Mile 45"),
                resource("PU-3", "Patrol Unit 3", Responding, "Highway 405, Mile 10"),
            ],
        },
        ResourceGroup {
            title: "Highway Patrols",
            resources: vec![
                resource("HP-1", "Highway Patrol 1", Available, "Highway 101, Mile 50"),
                resource("HP-2", "Highway Patrol 2", OnBreak, "Rest Stop 12"),
            ],
        },
        ResourceGroup {
            title: "Checkpoints",
            resources: vec![
                resource("CP-1", "North Checkpoint", Active, "Highway 101, Mile 60"),
                resource("CP-2", "East Checkpoint", Active, "Highway 5, Mile 80"),
                resource("CP-3", "South Checkpoint", Active, "Highway 405, Mile 30"),
            ],
        },
        ResourceGroup {
            title: "Special Units",
            resources: vec![
                resource("K9-1", "K-9 Unit", Available, "Central Station"),
                resource("SWAT-1", "SWAT Team", OnStandby, "Central Station"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_service_has_deployable_units() {
        for service in Service::all() {
            assert!(!deployable_units(*service).is_empty(), "{service}");
        }
    }

    #[test]
    fn patrol_availability_counts_available_only() {
        let groups = police_resources();
        let patrol = groups.iter().find(|g| g.title == "Patrol Units").unwrap();
        assert_eq!(patrol.availability(), (1, 3));
    }

    #[test]
    fn active_checkpoints_count_as_available() {
        let groups = police_resources();
        let checkpoints = groups.iter().find(|g| g.title == "Checkpoints").unwrap();
        assert_eq!(checkpoints.availability(), (3, 3));
    }
}
