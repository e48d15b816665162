//! The coordinated dispatch form as immutable state.
//!
//! A [`DispatchForm`] is never mutated in place: every user edit is a
//! [`FormAction`] fed through [`reduce`], which returns the next form.
//! The dispatch plan is derived from the current form on demand.

use highway_ers_incident_models::{IncidentType, Priority, Service};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::coordination::CoordinationProtocol;
use crate::resolver::{DispatchSummary, NotificationChain, ServiceSelection, resolve};

/// Rough casualty count entered by the dispatcher.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CasualtyEstimate {
    #[default]
    Unknown,
    None,
    /// 1-3 people
    Few,
    /// 4-10 people
    Several,
    /// More than 10 people
    Many,
}

impl CasualtyEstimate {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::None => "None",
            Self::Few => "1-3 People",
            Self::Several => "4-10 People",
            Self::Many => "More than 10 People",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unknown, Self::None, Self::Few, Self::Several, Self::Many]
    }
}

/// State of the coordinated dispatch form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchForm {
    pub incident_type: IncidentType,
    pub priority: Priority,
    pub services: ServiceSelection,
    pub location: String,
    pub casualties: CasualtyEstimate,
    pub description: String,
}

impl Default for DispatchForm {
    fn default() -> Self {
        Self {
            incident_type: IncidentType::Accident,
            priority: Priority::High,
            services: ServiceSelection::of(&[Service::Police, Service::Ems]),
            location: String::new(),
            casualties: CasualtyEstimate::Unknown,
            description: String::new(),
        }
    }
}

/// A single edit to the dispatch form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FormAction {
    SetIncidentType { incident_type: IncidentType },
    SetPriority { priority: Priority },
    ToggleService { service: Service, selected: bool },
    SetLocation { location: String },
    SetCasualties { casualties: CasualtyEstimate },
    SetDescription { description: String },
    Reset,
}

/// Applies `action` to `form`, returning the next form.
#[must_use]
pub fn reduce(form: &DispatchForm, action: FormAction) -> DispatchForm {
    let mut next = form.clone();
    match action {
        FormAction::SetIncidentType { incident_type } => next.incident_type = incident_type,
        FormAction::SetPriority { priority } => next.priority = priority,
        FormAction::ToggleService { service, selected } => {
            next.services = next.services.with(service, selected);
        }
        FormAction::SetLocation { location } => next.location = location,
        FormAction::SetCasualties { casualties } => next.casualties = casualties,
        FormAction::SetDescription { description } => next.description = description,
        FormAction::Reset => next = DispatchForm::default(),
    }
    next
}

/// Everything the response side panel shows for a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPlan {
    pub summary: DispatchSummary,
    pub notification_chain: NotificationChain,
    pub coordination: CoordinationProtocol,
}

impl DispatchForm {
    /// Applies a sequence of actions in order.
    #[must_use]
    pub fn apply_all(&self, actions: impl IntoIterator<Item = FormAction>) -> Self {
        actions
            .into_iter()
            .fold(self.clone(), |form, action| reduce(&form, action))
    }

    /// Derives the dispatch plan for the current form.
    #[must_use]
    pub fn plan(&self) -> DispatchPlan {
        let (summary, notification_chain) = resolve(self.services, self.priority);
        DispatchPlan {
            summary,
            notification_chain,
            coordination: CoordinationProtocol::for_incident_type(self.incident_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_incident_form() {
        let form = DispatchForm::default();
        assert_eq!(form.incident_type, IncidentType::Accident);
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.services.services(), vec![Service::Police, Service::Ems]);
        assert_eq!(form.casualties, CasualtyEstimate::Unknown);
    }

    #[test]
    fn reduce_leaves_previous_form_untouched() {
        let form = DispatchForm::default();
        let next = reduce(
            &form,
            FormAction::ToggleService {
                service: Service::Fire,
                selected: true,
            },
        );
        assert!(!form.services.fire);
        assert!(next.services.fire);
    }

    #[test]
    fn plan_tracks_form_edits() {
        let form = DispatchForm::default().apply_all([
            FormAction::SetIncidentType {
                incident_type: IncidentType::Fire,
            },
            FormAction::SetPriority {
                priority: Priority::Critical,
            },
            FormAction::ToggleService {
                service: Service::Police,
                selected: false,
            },
            FormAction::ToggleService {
                service: Service::Fire,
                selected: true,
            },
        ]);

        let plan = form.plan();
        assert_eq!(plan.summary.services(), vec![Service::Ems, Service::Fire]);
        assert_eq!(plan.notification_chain.len(), 6);
        assert_eq!(plan.coordination.command, "Fire Brigade Commander");
    }

    #[test]
    fn reset_restores_defaults() {
        let form = DispatchForm::default().apply_all([
            FormAction::SetLocation {
                location: "Highway 101, Mile 45".to_string(),
            },
            FormAction::Reset,
        ]);
        assert_eq!(form, DispatchForm::default());
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: FormAction = serde_json::from_value(serde_json::json!({
            "type": "toggleService",
            "service": "ems",
            "selected": false,
        }))
        .unwrap();
        assert_eq!(
            action,
            FormAction::ToggleService {
                service: Service::Ems,
                selected: false
            }
        );
    }
}
