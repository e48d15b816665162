//! HTTP handler functions for the highway emergency response API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use highway_ers_dispatch::{DispatchForm, authority_alert, landing_service, resolve_fields};
use highway_ers_incident::roster::{deployable_units, police_resources};
use highway_ers_incident::{IncidentError, deploy_units};
use highway_ers_incident_models::{Incident, Service};
use highway_ers_notify::{LoggingGateway, NotificationGateway as _, SmsNotification, deliver};
use highway_ers_report::{ReportInput, build_report, join_pages, render_pages};
use highway_ers_server_models::{
    ApiAlertOutcome, ApiError, ApiHealth, ApiIncidentFields, ApiReport, ApiUnits,
    CreateIncidentResponse, DeployRequest, IncidentListParams, SendSmsFailure, SendSmsResponse,
    dashboard_path,
};

use crate::AppState;

fn not_found(e: &IncidentError) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(e.to_string()))
}

/// Looks up `id`, or builds the 404 response.
fn find<'a>(state: &'a AppState, id: &str) -> Result<&'a Incident, HttpResponse> {
    state.registry.get(id).map_err(|e| {
        log::debug!("{e}");
        not_found(&e)
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/incidents`
///
/// Lists incidents, optionally only one service's dashboard and only
/// unresolved ones.
pub async fn list_incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentListParams>,
) -> HttpResponse {
    let incidents: Vec<&Incident> = state
        .registry
        .all()
        .iter()
        .filter(|i| params.service.is_none_or(|s| i.primary_service() == s))
        .filter(|i| !params.active || i.is_active())
        .collect();

    HttpResponse::Ok().json(incidents)
}

/// `GET /api/incidents/{id}`
pub async fn get_incident(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match find(&state, &path) {
        Ok(incident) => HttpResponse::Ok().json(incident),
        Err(response) => response,
    }
}

/// `GET /api/incidents/{id}/fields`
///
/// Returns the category-specific report fields with defaults applied.
pub async fn incident_fields(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match find(&state, &path) {
        Ok(incident) => HttpResponse::Ok().json(ApiIncidentFields {
            incident_id: incident.id.clone(),
            category: incident.category(),
            fields: resolve_fields(incident),
        }),
        Err(response) => response,
    }
}

/// `POST /api/dispatch/plan`
///
/// Derives the dispatch plan for a coordinated incident form without
/// creating anything.
pub async fn dispatch_plan(form: web::Json<DispatchForm>) -> HttpResponse {
    HttpResponse::Ok().json(form.plan())
}

/// `POST /api/incidents`
///
/// Simulates creating a coordinated incident: derives the plan, picks the
/// landing dashboard, and for high and critical incidents alerts the
/// authority contacts. A failed alert is reported in the response; the
/// incident is still created.
pub async fn create_incident(
    state: web::Data<AppState>,
    form: web::Json<DispatchForm>,
) -> HttpResponse {
    let form = form.into_inner();
    log::info!(
        "Creating {} incident ({} priority) at '{}'",
        form.incident_type,
        form.priority,
        form.location
    );

    let plan = form.plan();
    let landing = landing_service(form.services);

    let authority_alert = match authority_alert(
        form.incident_type,
        form.priority,
        &state.authority_numbers,
    ) {
        Some(alert) => {
            let notification = SmsNotification {
                phone_numbers: alert.phone_numbers,
                message: alert.message,
                priority: alert.priority,
            };
            let recipients = notification.phone_numbers.len();

            Some(
                match deliver(state.gateway.as_ref(), &notification, &state.retry).await {
                    Ok(delivery) => ApiAlertOutcome {
                        delivered: true,
                        recipients,
                        attempts: Some(delivery.attempts),
                        message: delivery.receipt.message,
                    },
                    Err(e) => {
                        log::error!("Failed to send authority alert: {e}");
                        ApiAlertOutcome {
                            delivered: false,
                            recipients,
                            attempts: None,
                            message: e.to_string(),
                        }
                    }
                },
            )
        }
        None => None,
    };

    HttpResponse::Ok().json(CreateIncidentResponse {
        plan,
        landing_service: landing,
        redirect: dashboard_path(landing),
        authority_alert,
    })
}

/// `POST /api/incidents/{id}/deploy`
pub async fn deploy(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<DeployRequest>,
) -> HttpResponse {
    let incident = match find(&state, &path) {
        Ok(incident) => incident,
        Err(response) => return response,
    };

    match deploy_units(incident, body.service, &body.units) {
        Ok(deployment) => HttpResponse::Ok().json(deployment),
        Err(e) => {
            log::warn!("Rejected deployment to {}: {e}", incident.id);
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
    }
}

/// `POST /api/incidents/{id}/report`
///
/// Renders the incident report as paginated text.
pub async fn report(
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<ReportInput>,
) -> HttpResponse {
    let incident = match find(&state, &path) {
        Ok(incident) => incident,
        Err(response) => return response,
    };

    let report = build_report(incident, &input, Utc::now());
    match render_pages(&report, state.report_layout) {
        Ok(pages) => HttpResponse::Ok().json(ApiReport {
            filename: report.filename(),
            pages: pages.len(),
            text: join_pages(&pages),
        }),
        Err(e) => {
            log::error!("Failed to render report for {}: {e}", incident.id);
            HttpResponse::InternalServerError().json(ApiError::new("Failed to render report"))
        }
    }
}

/// `GET /api/units/{service}`
pub async fn units(path: web::Path<Service>) -> HttpResponse {
    let service = path.into_inner();
    let resource_groups = match service {
        Service::Police => police_resources().into_iter().map(Into::into).collect(),
        Service::Ems | Service::Fire => Vec::new(),
    };

    HttpResponse::Ok().json(ApiUnits {
        service,
        deployable: deployable_units(service),
        resource_groups,
    })
}

/// `POST /api/notifications/send-sms`
///
/// Mock SMS endpoint: logs the notification and answers after the
/// configured delay. A malformed body is a 500, matching the endpoint
/// this mock stands in for.
pub async fn send_sms(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let failure = || {
        HttpResponse::InternalServerError().json(SendSmsFailure {
            success: false,
            error: "Failed to send SMS notification".to_string(),
        })
    };

    let notification: SmsNotification = match serde_json::from_slice(&body) {
        Ok(notification) => notification,
        Err(e) => {
            log::error!("Error sending SMS notification: {e}");
            return failure();
        }
    };

    match LoggingGateway::new(state.sms_delay).send(&notification).await {
        Ok(receipt) => HttpResponse::Ok().json(SendSmsResponse {
            success: true,
            message: receipt.message,
            timestamp: receipt.timestamp,
        }),
        Err(e) => {
            log::error!("Error sending SMS notification: {e}");
            failure()
        }
    }
}
