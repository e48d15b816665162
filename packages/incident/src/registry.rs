//! Compile-time registry of incident fixtures.
//!
//! Each dashboard's incidents live in a TOML file under `fixtures/`. The
//! files are embedded with [`include_str!`] and parsed each time a registry is
//! loaded.

use std::collections::BTreeMap;

use highway_ers_incident_models::{Incident, Service};
use serde::Deserialize;

use crate::IncidentError;

/// Embedded fixture files, one per dashboard.
const FIXTURE_TOMLS: &[(&str, &str)] = &[
    ("police", include_str!("../fixtures/police.toml")),
    ("ems", include_str!("../fixtures/ems.toml")),
    ("fire", include_str!("../fixtures/fire.toml")),
];

#[cfg(test)]
const EXPECTED_INCIDENT_COUNT: usize = 9;

#[derive(Deserialize)]
struct FixtureFile {
    incidents: Vec<Incident>,
}

/// Returns every fixture incident, in file order.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. The files are
/// compile-time constants, so a parse failure is a development error.
#[must_use]
pub fn all_incidents() -> Vec<Incident> {
    FIXTURE_TOMLS
        .iter()
        .flat_map(|(name, toml_str)| {
            let file: FixtureFile = toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse incident fixtures '{name}': {e}"));
            file.incidents
        })
        .collect()
}

/// Read-only index of incidents by id.
#[derive(Debug, Clone)]
pub struct IncidentRegistry {
    incidents: Vec<Incident>,
    by_id: BTreeMap<String, usize>,
}

impl IncidentRegistry {
    /// Builds a registry from the embedded fixtures.
    #[must_use]
    pub fn load() -> Self {
        Self::from_incidents(all_incidents())
    }

    /// Builds a registry from an arbitrary incident list. Later duplicates
    /// of an id are ignored.
    #[must_use]
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        let mut kept = Vec::with_capacity(incidents.len());
        let mut by_id = BTreeMap::new();
        for incident in incidents {
            if by_id.contains_key(&incident.id) {
                log::warn!("Ignoring duplicate incident id {}", incident.id);
                continue;
            }
            by_id.insert(incident.id.clone(), kept.len());
            kept.push(incident);
        }
        Self {
            incidents: kept,
            by_id,
        }
    }

    /// Looks up an incident by id.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError::NotFound`] if no incident has this id.
    pub fn get(&self, id: &str) -> Result<&Incident, IncidentError> {
        self.by_id
            .get(id)
            .map(|&idx| &self.incidents[idx])
            .ok_or_else(|| IncidentError::NotFound { id: id.to_string() })
    }

    /// All incidents, in registration order.
    #[must_use]
    pub fn all(&self) -> &[Incident] {
        &self.incidents
    }

    /// Incidents listed on the given service's dashboard.
    pub fn for_service(&self, service: Service) -> impl Iterator<Item = &Incident> {
        self.incidents
            .iter()
            .filter(move |incident| incident.primary_service() == service)
    }

    /// Incidents that are not yet resolved.
    pub fn active(&self) -> impl Iterator<Item = &Incident> {
        self.incidents.iter().filter(|incident| incident.is_active())
    }

    /// Number of registered incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the registry holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for IncidentRegistry {
    fn default() -> Self {
        Self::load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highway_ers_incident_models::{IncidentCategory, IncidentDetails, Priority};
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_fixtures() {
        assert_eq!(all_incidents().len(), EXPECTED_INCIDENT_COUNT);
    }

    #[test]
    fn incident_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for incident in all_incidents() {
            assert!(
                seen.insert(incident.id.clone()),
                "Duplicate incident id: {}",
                incident.id
            );
        }
    }

    #[test]
    fn id_prefix_matches_category() {
        for incident in all_incidents() {
            assert_eq!(
                IncidentCategory::from_id(&incident.id),
                incident.category(),
                "{} has category {:?}",
                incident.id,
                incident.category()
            );
        }
    }

    #[test]
    fn lookup_reports_not_found() {
        let registry = IncidentRegistry::load();
        assert_eq!(registry.get("MED-1234").unwrap().priority, Priority::Critical);
        assert_eq!(
            registry.get("INC-9999"),
            Err(IncidentError::NotFound {
                id: "INC-9999".to_string()
            })
        );
    }

    #[test]
    fn each_dashboard_has_three_incidents() {
        let registry = IncidentRegistry::load();
        for service in Service::all() {
            let incidents: Vec<&Incident> = registry.for_service(*service).collect();
            assert_eq!(incidents.len(), 3, "{service} dashboard");
            assert!(incidents.iter().all(|i| i.primary_service() == *service));
        }
    }

    #[test]
    fn report_fixtures_carry_details() {
        let registry = IncidentRegistry::load();
        let fire = registry.get("FIRE-1234").unwrap();
        let IncidentDetails::Fire(details) = &fire.details else {
            panic!("FIRE-1234 should carry fire details");
        };
        assert_eq!(details.hazardous_materials.as_deref(), Some("Diesel fuel"));
        assert_eq!(details.resources_needed, vec!["Water", "Foam"]);
        assert_eq!(fire.actions.len(), 5);
        assert_eq!(fire.date_time(), "2023-04-28 10:23 AM");
    }

    #[test]
    fn duplicates_keep_first_registration() {
        let mut incidents = all_incidents();
        let mut dup = incidents[0].clone();
        dup.description = "duplicate".to_string();
        incidents.push(dup);

        let registry = IncidentRegistry::from_incidents(incidents);
        assert_eq!(registry.len(), EXPECTED_INCIDENT_COUNT);
        assert_ne!(registry.get("INC-1234").unwrap().description, "duplicate");
        assert_eq!(registry.all().len(), EXPECTED_INCIDENT_COUNT);
        assert!(registry.all().iter().all(|i| i.description != "duplicate"));
        assert_eq!(registry.for_service(Service::Police).count(), 3);
        assert!(registry.active().all(|i| i.description != "duplicate"));
    }
}
