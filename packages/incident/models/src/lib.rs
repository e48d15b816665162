#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident, priority and service types for the highway emergency
//! response system.
//!
//! Every other crate in the workspace speaks in terms of these types. An
//! incident's category is carried on the incident itself as a tagged
//! [`IncidentDetails`] variant, so the set of category-specific fields is
//! fixed at creation time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Priority of an incident, from [`Priority::Low`] to [`Priority::Critical`].
///
/// Ordering follows urgency, so `Priority::Low < Priority::Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum Priority {
    /// Minor incident
    Low = 1,
    /// Requires attention
    Medium = 2,
    /// Serious situation
    High = 3,
    /// Immediate life threat
    Critical = 4,
}

impl TryFrom<String> for Priority {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Priority {
    /// Returns the numeric rank of this priority (1-4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the description shown next to the priority in the
    /// dispatch form.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Critical => "Immediate Life Threat",
            Self::High => "Serious Situation",
            Self::Medium => "Requires Attention",
            Self::Low => "Minor Incident",
        }
    }

    /// Whether creating an incident at this priority alerts the high
    /// authority contacts by SMS.
    #[must_use]
    pub const fn requires_authority_alert(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    /// Returns all variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// A responding agency.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Service {
    /// Police and highway patrol
    Police,
    /// Emergency medical services
    Ems,
    /// Fire brigade
    Fire,
}

impl TryFrom<String> for Service {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Service {
    /// Human-readable agency name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Police => "Police",
            Self::Ems => "Emergency Medical Services",
            Self::Fire => "Fire Brigade",
        }
    }

    /// Heading used for this service in a response summary.
    #[must_use]
    pub const fn response_title(self) -> &'static str {
        match self {
            Self::Police => "Police Response",
            Self::Ems => "Medical Response",
            Self::Fire => "Fire Brigade Response",
        }
    }

    /// Returns all variants in dispatch order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Police, Self::Ems, Self::Fire]
    }
}

/// Category of an incident record, which decides its report fields and
/// the dashboard it belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentCategory {
    /// Traffic, criminal and other police-handled incidents (`INC-`)
    General,
    /// Medical incidents handled by EMS (`MED-`)
    Medical,
    /// Fire incidents (`FIRE-`)
    Fire,
}

impl IncidentCategory {
    /// Identifier prefix used for incidents of this category.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::General => "INC",
            Self::Medical => "MED",
            Self::Fire => "FIRE",
        }
    }

    /// The service whose dashboard lists incidents of this category.
    #[must_use]
    pub const fn primary_service(self) -> Service {
        match self {
            Self::General => Service::Police,
            Self::Medical => Service::Ems,
            Self::Fire => Service::Fire,
        }
    }

    /// Classifies a bare identifier by its prefix.
    ///
    /// Only meant for identifiers that arrive without a category (e.g. a
    /// report requested by id alone). Anything that is not `MED` or
    /// `FIRE` is [`IncidentCategory::General`].
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        if id.starts_with(Self::Medical.id_prefix()) {
            Self::Medical
        } else if id.starts_with(Self::Fire.id_prefix()) {
            Self::Fire
        } else {
            Self::General
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::General, Self::Medical, Self::Fire]
    }
}

/// Lifecycle status shown on the dashboards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum IncidentStatus {
    /// Reported, no unit assigned yet
    Pending,
    /// Units responding
    Responding,
    /// Units travelling to the scene
    EnRoute,
    /// Units at the scene
    OnScene,
    /// Being handled
    InProgress,
    /// Closed
    Resolved,
}

impl IncidentStatus {
    /// Whether the incident still appears on the active dashboards.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

/// Kind of emergency chosen when creating a coordinated incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IncidentType {
    /// Traffic accident
    Accident,
    /// Medical emergency
    Medical,
    /// Fire
    Fire,
    /// Criminal activity
    Crime,
    /// Natural disaster
    Disaster,
    /// Anything else
    Other,
}

impl TryFrom<String> for IncidentType {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl IncidentType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accident => "Traffic Accident",
            Self::Medical => "Medical Emergency",
            Self::Fire => "Fire",
            Self::Crime => "Criminal Activity",
            Self::Disaster => "Natural Disaster",
            Self::Other => "Other",
        }
    }

    /// Returns all variants in form order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Accident,
            Self::Medical,
            Self::Fire,
            Self::Crime,
            Self::Disaster,
            Self::Other,
        ]
    }
}

/// Hazard level reported for fire incidents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum HazardLevel {
    /// Contained
    Low,
    /// Possible escalation
    Medium,
    /// Spreading or hazardous materials involved
    High,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// One entry of an incident's actions-taken timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Wall-clock time of the action, as reported (e.g. `"10:25 AM"`).
    pub time: String,
    /// What was done.
    pub action: String,
    /// Who did it.
    pub by: String,
}

/// Fields recorded for general (police-handled) incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralDetails {
    pub casualties: Option<String>,
    pub vehicles_involved: Option<String>,
    pub weather_conditions: Option<String>,
    pub road_conditions: Option<String>,
}

/// Fields recorded for medical incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalDetails {
    pub casualties: Option<String>,
    pub treatment_provided: Option<String>,
    pub hospital_destination: Option<String>,
    pub patient_status: Option<String>,
}

/// Fields recorded for fire incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FireDetails {
    pub fire_type: Option<String>,
    pub resources_used: Option<String>,
    pub hazardous_materials: Option<String>,
    pub damage_assessment: Option<String>,
    pub hazard_level: Option<HazardLevel>,
    pub resources_needed: Vec<String>,
}

/// Category-specific incident data, tagged by `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum IncidentDetails {
    /// See [`IncidentCategory::General`].
    General(GeneralDetails),
    /// See [`IncidentCategory::Medical`].
    Medical(MedicalDetails),
    /// See [`IncidentCategory::Fire`].
    Fire(FireDetails),
}

impl IncidentDetails {
    /// The category this variant belongs to.
    #[must_use]
    pub const fn category(&self) -> IncidentCategory {
        match self {
            Self::General(_) => IncidentCategory::General,
            Self::Medical(_) => IncidentCategory::Medical,
            Self::Fire(_) => IncidentCategory::Fire,
        }
    }

    /// Empty details for the given category.
    #[must_use]
    pub fn empty(category: IncidentCategory) -> Self {
        match category {
            IncidentCategory::General => Self::General(GeneralDetails::default()),
            IncidentCategory::Medical => Self::Medical(MedicalDetails::default()),
            IncidentCategory::Fire => Self::Fire(FireDetails::default()),
        }
    }
}

/// A single emergency event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Category-prefixed identifier (e.g. `"MED-1234"`).
    pub id: String,
    /// Free-text incident type (e.g. `"Vehicle Fire"`).
    #[serde(rename = "type")]
    pub incident_type: String,
    /// Location description (e.g. `"Highway 101, Mile 45"`).
    pub location: String,
    pub status: IncidentStatus,
    pub priority: Priority,
    /// Date of the report, when known.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Wall-clock time of the report (e.g. `"10:23 AM"`).
    pub time: String,
    pub coordinates: Coordinates,
    /// Assigned units, in assignment order.
    pub responders: Vec<String>,
    pub description: String,
    /// Actions-taken timeline, oldest first.
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
    /// Estimated arrival of the first unit (e.g. `"7 minutes"`).
    #[serde(default)]
    pub estimated_arrival: Option<String>,
    pub details: IncidentDetails,
}

impl Incident {
    /// The incident's category, as carried by its details.
    #[must_use]
    pub const fn category(&self) -> IncidentCategory {
        self.details.category()
    }

    /// The service whose dashboard lists this incident.
    #[must_use]
    pub const fn primary_service(&self) -> Service {
        self.category().primary_service()
    }

    /// Whether the incident is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Report date and time, e.g. `"2023-04-28 10:23 AM"`.
    #[must_use]
    pub fn date_time(&self) -> String {
        match self.date {
            Some(date) => format!("{} {}", date.format("%Y-%m-%d"), self.time),
            None => self.time.clone(),
        }
    }
}
