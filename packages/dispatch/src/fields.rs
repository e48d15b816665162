//! Report field selection.
//!
//! Each incident category has a closed set of four extra fields that are
//! shown on screen and printed in the report. Every field carries its own
//! placeholder, so a missing value always renders the same way
//! regardless of category.

use highway_ers_incident_models::{Incident, IncidentCategory, IncidentDetails};
use serde::Serialize;

/// Placeholder for absent values outside the general category.
const NOT_AVAILABLE: &str = "N/A";

/// One category-specific report field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Wire name of the field (e.g. `"treatmentProvided"`).
    pub key: &'static str,
    /// Printed label (e.g. `"Treatment Provided"`).
    pub label: &'static str,
    /// Rendered when the incident has no value for this field.
    pub placeholder: &'static str,
}

const fn field(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        placeholder,
    }
}

const GENERAL_FIELDS: &[FieldSpec] = &[
    field("casualties", "Casualties", "None"),
    field("vehiclesInvolved", "Vehicles Involved", NOT_AVAILABLE),
    field("weatherConditions", "Weather Conditions", NOT_AVAILABLE),
    field("roadConditions", "Road Conditions", NOT_AVAILABLE),
];

const MEDICAL_FIELDS: &[FieldSpec] = &[
    field("casualties", "Casualties", NOT_AVAILABLE),
    field("treatmentProvided", "Treatment Provided", NOT_AVAILABLE),
    field("hospitalDestination", "Hospital Destination", NOT_AVAILABLE),
    field("patientStatus", "Patient Status", NOT_AVAILABLE),
];

const FIRE_FIELDS: &[FieldSpec] = &[
    field("fireType", "Fire Type", NOT_AVAILABLE),
    field("resourcesUsed", "Resources Used", NOT_AVAILABLE),
    field("hazardousMaterials", "Hazardous Materials", NOT_AVAILABLE),
    field("damageAssessment", "Damage Assessment", NOT_AVAILABLE),
];

/// The ordered field set for one incident category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    pub category: IncidentCategory,
    pub fields: &'static [FieldSpec],
}

impl FieldSet {
    /// Field set for `category`.
    #[must_use]
    pub const fn for_category(category: IncidentCategory) -> Self {
        let fields = match category {
            IncidentCategory::General => GENERAL_FIELDS,
            IncidentCategory::Medical => MEDICAL_FIELDS,
            IncidentCategory::Fire => FIRE_FIELDS,
        };
        Self { category, fields }
    }

    /// Field keys, in print order.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key).collect()
    }
}

/// Field set for a bare incident id.
///
/// `MED…` ids get the medical set, `FIRE…` ids the fire set, and
/// everything else (including `INC…` and unknown prefixes) the general
/// set. Prefer [`FieldSet::for_category`] when the incident is at hand.
#[must_use]
pub fn select_fields(incident_id: &str) -> FieldSet {
    FieldSet::for_category(IncidentCategory::from_id(incident_id))
}

/// A field paired with the value to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// `true` when `value` is the field's placeholder.
    pub defaulted: bool,
}

/// Resolves the category fields of `incident`, substituting placeholders
/// for absent or blank values.
#[must_use]
pub fn resolve_fields(incident: &Incident) -> Vec<ResolvedField> {
    let set = FieldSet::for_category(incident.category());
    let values = field_values(&incident.details);

    set.fields
        .iter()
        .zip(values)
        .map(|(spec, value)| {
            let value = value.map(str::trim).filter(|v| !v.is_empty());
            ResolvedField {
                key: spec.key,
                label: spec.label,
                value: value.unwrap_or(spec.placeholder).to_string(),
                defaulted: value.is_none(),
            }
        })
        .collect()
}

/// Values in the same order as the category's [`FieldSpec`]s.
fn field_values(details: &IncidentDetails) -> [Option<&str>; 4] {
    match details {
        IncidentDetails::General(d) => [
            d.casualties.as_deref(),
            d.vehicles_involved.as_deref(),
            d.weather_conditions.as_deref(),
            d.road_conditions.as_deref(),
        ],
        IncidentDetails::Medical(d) => [
            d.casualties.as_deref(),
            d.treatment_provided.as_deref(),
            d.hospital_destination.as_deref(),
            d.patient_status.as_deref(),
        ],
        IncidentDetails::Fire(d) => [
            d.fire_type.as_deref(),
            d.resources_used.as_deref(),
            d.hazardous_materials.as_deref(),
            d.damage_assessment.as_deref(),
        ],
    }
}
