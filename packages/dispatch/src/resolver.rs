//! Priority notification resolver.
//!
//! Maps the services requested for an incident and its priority to the
//! units dispatched per service, their ETA, and the chain of authorities
//! to notify. The unit table is fixed and independent of incident
//! content. Every input has exactly one output.

use std::collections::BTreeMap;

use highway_ers_incident_models::{Priority, Service};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Which services a coordinated incident requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSelection {
    pub police: bool,
    pub ems: bool,
    pub fire: bool,
}

impl ServiceSelection {
    /// A selection with only the given services set.
    #[must_use]
    pub fn of(services: &[Service]) -> Self {
        services
            .iter()
            .fold(Self::default(), |selection, &service| {
                selection.with(service, true)
            })
    }

    /// Returns a copy with `service` set to `selected`.
    #[must_use]
    pub const fn with(mut self, service: Service, selected: bool) -> Self {
        match service {
            Service::Police => self.police = selected,
            Service::Ems => self.ems = selected,
            Service::Fire => self.fire = selected,
        }
        self
    }

    /// Whether `service` is selected.
    #[must_use]
    pub const fn contains(self, service: Service) -> bool {
        match service {
            Service::Police => self.police,
            Service::Ems => self.ems,
            Service::Fire => self.fire,
        }
    }

    /// Selected services in dispatch order.
    #[must_use]
    pub fn services(self) -> Vec<Service> {
        Service::all()
            .iter()
            .copied()
            .filter(|&service| self.contains(service))
            .collect()
    }

    /// Whether no service is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.police && !self.ems && !self.fire
    }
}

/// Units and ETA assigned to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDispatch {
    /// Unit allocations, e.g. `"Patrol Unit ×2"`.
    pub units: Vec<String>,
    pub eta_minutes: u32,
}

impl ServiceDispatch {
    /// The fixed allocation for `service`.
    #[must_use]
    pub fn for_service(service: Service) -> Self {
        let (units, eta_minutes) = unit_table(service);
        Self {
            units: units
                .iter()
                .map(|(unit, count)| format!("{unit} ×{count}"))
                .collect(),
            eta_minutes,
        }
    }
}

/// `(unit kind, count)` pairs and ETA in minutes for each service.
const fn unit_table(service: Service) -> (&'static [(&'static str, u32)], u32) {
    match service {
        Service::Police => (&[("Patrol Unit", 2), ("Highway Patrol", 1)], 5),
        Service::Ems => (&[("Ambulance", 2), ("Paramedic Unit", 1)], 7),
        Service::Fire => (&[("Fire Engine", 1), ("Tanker", 1)], 8),
    }
}

/// Units and ETA per requested service. Derived, never stored.
///
/// Empty when no service was requested; callers show a "no services
/// selected" state rather than treating it as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DispatchSummary(BTreeMap<Service, ServiceDispatch>);

impl DispatchSummary {
    /// Builds the summary for a selection.
    #[must_use]
    pub fn for_selection(selection: ServiceSelection) -> Self {
        Self(
            selection
                .services()
                .into_iter()
                .map(|service| (service, ServiceDispatch::for_service(service)))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, service: Service) -> Option<&ServiceDispatch> {
        self.0.get(&service)
    }

    /// Services present in the summary, in dispatch order.
    #[must_use]
    pub fn services(&self) -> Vec<Service> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Service, &ServiceDispatch)> {
        self.0.iter().map(|(service, dispatch)| (*service, dispatch))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Urgency tier a notification recipient belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UrgencyBand {
    /// Informed for the most severe incidents only
    Critical,
    /// Informed for high and critical incidents
    High,
    /// Always informed
    Base,
}

/// One authority in a notification chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecipient {
    pub recipient_role: &'static str,
    pub urgency_band: UrgencyBand,
}

const CRITICAL_TIER: &[&str] = &[
    "Regional Emergency Director",
    "Highway Authority",
    "Local Government Officials",
];

const HIGH_TIER: &[&str] = &["District Emergency Coordinator"];

const BASE_TIER: &[&str] = &["Local Emergency Services", "Nearby Checkpoints"];

/// Ordered list of authorities to inform, most urgent tier first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NotificationChain(Vec<NotificationRecipient>);

impl NotificationChain {
    /// Builds the chain for `priority`. Each priority includes every
    /// recipient of the priorities below it.
    #[must_use]
    pub fn for_priority(priority: Priority) -> Self {
        let mut tiers: Vec<(UrgencyBand, &[&str])> = Vec::with_capacity(3);
        if priority >= Priority::Critical {
            tiers.push((UrgencyBand::Critical, CRITICAL_TIER));
        }
        if priority >= Priority::High {
            tiers.push((UrgencyBand::High, HIGH_TIER));
        }
        tiers.push((UrgencyBand::Base, BASE_TIER));

        Self(
            tiers
                .into_iter()
                .flat_map(|(urgency_band, roles)| {
                    roles.iter().map(move |&recipient_role| NotificationRecipient {
                        recipient_role,
                        urgency_band,
                    })
                })
                .collect(),
        )
    }

    /// Recipient roles in notification order.
    #[must_use]
    pub fn roles(&self) -> Vec<&'static str> {
        self.0.iter().map(|r| r.recipient_role).collect()
    }

    #[must_use]
    pub fn contains_role(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.recipient_role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecipient> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves the dispatch summary and notification chain for an incident.
#[must_use]
pub fn resolve(
    selection: ServiceSelection,
    priority: Priority,
) -> (DispatchSummary, NotificationChain) {
    (
        DispatchSummary::for_selection(selection),
        NotificationChain::for_priority(priority),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn all_selections() -> Vec<ServiceSelection> {
        (0..8u8)
            .map(|bits| ServiceSelection {
                police: bits & 1 != 0,
                ems: bits & 2 != 0,
                fire: bits & 4 != 0,
            })
            .collect()
    }

    #[test]
    fn summary_keys_match_selected_flags() {
        for selection in all_selections() {
            for priority in Priority::all() {
                let (summary, _) = resolve(selection, *priority);
                assert_eq!(summary.services(), selection.services(), "{selection:?}");
            }
        }
    }

    #[test]
    fn empty_selection_yields_empty_summary() {
        for priority in Priority::all() {
            let (summary, chain) = resolve(ServiceSelection::default(), *priority);
            assert!(summary.is_empty());
            assert!(!chain.is_empty());
        }
    }

    #[test]
    fn chain_never_shrinks_as_priority_rises() {
        for pair in Priority::all().windows(2) {
            let lower: BTreeSet<&str> = NotificationChain::for_priority(pair[0])
                .roles()
                .into_iter()
                .collect();
            let higher: BTreeSet<&str> = NotificationChain::for_priority(pair[1])
                .roles()
                .into_iter()
                .collect();
            assert!(
                lower.is_subset(&higher),
                "{:?} chain is not contained in {:?} chain",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn medium_and_low_notify_base_tier_only() {
        for priority in [Priority::Low, Priority::Medium] {
            let chain = NotificationChain::for_priority(priority);
            assert_eq!(
                chain.roles(),
                vec!["Local Emergency Services", "Nearby Checkpoints"]
            );
            assert!(chain.iter().all(|r| r.urgency_band == UrgencyBand::Base));
        }
    }

    #[test]
    fn high_adds_district_coordinator_first() {
        let chain = NotificationChain::for_priority(Priority::High);
        assert_eq!(
            chain.roles(),
            vec![
                "District Emergency Coordinator",
                "Local Emergency Services",
                "Nearby Checkpoints",
            ]
        );
    }

    #[test]
    fn critical_police_and_ems_scenario() {
        let selection = ServiceSelection {
            police: true,
            ems: true,
            fire: false,
        };
        let (summary, chain) = resolve(selection, Priority::Critical);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.get(Service::Police).unwrap().eta_minutes, 5);
        assert_eq!(summary.get(Service::Ems).unwrap().eta_minutes, 7);
        assert!(summary.get(Service::Fire).is_none());

        let roles: BTreeSet<&str> = chain.roles().into_iter().collect();
        assert_eq!(chain.len(), 6);
        assert_eq!(roles.len(), 6);
        assert_eq!(chain.iter().next().unwrap().urgency_band, UrgencyBand::Critical);
        assert!(chain.contains_role("Highway Authority"));
    }

    #[test]
    fn unit_table_is_fixed() {
        assert_eq!(
            ServiceDispatch::for_service(Service::Police).units,
            vec!["Patrol Unit ×2", "Highway Patrol ×1"]
        );
        assert_eq!(
            ServiceDispatch::for_service(Service::Ems).units,
            vec!["Ambulance ×2", "Paramedic Unit ×1"]
        );
        let fire = ServiceDispatch::for_service(Service::Fire);
        assert_eq!(fire.units, vec!["Fire Engine ×1", "Tanker ×1"]);
        assert_eq!(fire.eta_minutes, 8);
    }

    #[test]
    fn selection_builders_agree() {
        let selection = ServiceSelection::of(&[Service::Fire, Service::Police]);
        assert!(selection.police && selection.fire && !selection.ems);
        assert_eq!(selection.services(), vec![Service::Police, Service::Fire]);
        assert!(ServiceSelection::of(&[]).is_empty());
    }

    #[test]
    fn summary_serializes_as_service_map() {
        let (summary, _) = resolve(ServiceSelection::of(&[Service::Ems]), Priority::Low);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["ems"]["etaMinutes"], 7);
        assert!(json.get("police").is_none());
    }
}
