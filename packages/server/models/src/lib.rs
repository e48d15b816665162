#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the highway emergency response
//! server.
//!
//! These types are serialized to JSON for the REST API. Domain types that
//! already have a stable JSON shape (incidents, dispatch plans,
//! deployments) are returned as-is; the types here cover the envelopes
//! around them.

use chrono::{DateTime, Utc};
use highway_ers_dispatch::{DispatchPlan, ResolvedField};
use highway_ers_incident::roster::{Resource, ResourceGroup};
use highway_ers_incident_models::{IncidentCategory, Service};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters for the incident list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentListParams {
    /// Only incidents belonging to this service's dashboard.
    pub service: Option<Service>,
    /// Only incidents that are not yet resolved.
    #[serde(default)]
    pub active: bool,
}

/// Additional report fields for one incident.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidentFields {
    pub incident_id: String,
    pub category: IncidentCategory,
    pub fields: Vec<ResolvedField>,
}

/// Result of sending the authority alert for a new incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlertOutcome {
    pub delivered: bool,
    pub recipients: usize,
    /// Gateway attempts, when delivery succeeded.
    pub attempts: Option<u32>,
    /// Gateway acknowledgement or failure reason.
    pub message: String,
}

/// Response to `POST /api/incidents`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentResponse {
    pub plan: DispatchPlan,
    /// Dashboard the dispatcher should land on. `None` means home.
    pub landing_service: Option<Service>,
    /// Path of that dashboard, e.g. `/police` or `/`.
    pub redirect: String,
    /// Present only for high and critical incidents.
    pub authority_alert: Option<ApiAlertOutcome>,
}

/// Dashboard path for a landing service.
#[must_use]
pub fn dashboard_path(service: Option<Service>) -> String {
    service.map_or_else(|| "/".to_string(), |s| format!("/{s}"))
}

/// Request body of `POST /api/incidents/{id}/deploy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    pub service: Service,
    pub units: Vec<String>,
}

/// A resource group with its availability badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceGroup {
    pub title: &'static str,
    pub available: usize,
    pub total: usize,
    pub resources: Vec<Resource>,
}

impl From<ResourceGroup> for ApiResourceGroup {
    fn from(group: ResourceGroup) -> Self {
        let (available, total) = group.availability();
        Self {
            title: group.title,
            available,
            total,
            resources: group.resources,
        }
    }
}

/// Response of `GET /api/units/{service}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUnits {
    pub service: Service,
    /// Units that can be deployed to an incident.
    pub deployable: &'static [&'static str],
    /// Resource panel; only the police dashboard has one.
    pub resource_groups: Vec<ApiResourceGroup>,
}

/// Rendered incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    pub filename: String,
    pub pages: usize,
    pub text: String,
}

/// Successful response of the SMS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Failure response of the SMS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSmsFailure {
    pub success: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_path_falls_back_to_home() {
        assert_eq!(dashboard_path(Some(Service::Ems)), "/ems");
        assert_eq!(dashboard_path(None), "/");
    }

    #[test]
    fn list_params_default_to_everything() {
        let params: IncidentListParams = serde_json::from_str("{}").unwrap();
        assert!(params.service.is_none());
        assert!(!params.active);
    }

    #[test]
    fn resource_group_carries_availability() {
        let groups = highway_ers_incident::roster::police_resources();
        let first = groups[0].clone();
        let (available, total) = first.availability();
        let api = ApiResourceGroup::from(first);
        assert_eq!((api.available, api.total), (available, total));
    }
}
