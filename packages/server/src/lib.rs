#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the highway emergency response system.
//!
//! Serves the incident fixtures, the dispatch plan for a coordinated
//! incident form, unit deployment and report export under `/api`. The
//! mock SMS endpoint at `/api/notifications/send-sms` logs each
//! notification instead of sending it.

mod handlers;
pub mod interactive;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use highway_ers_incident::IncidentRegistry;
use highway_ers_notify::{GatewayConfig, NotificationError, NotificationGateway, RetryPolicy};
use highway_ers_report::PageLayout;

/// Shared application state. Read-only once the server is running.
pub struct AppState {
    /// Incident fixtures.
    pub registry: Arc<IncidentRegistry>,
    /// Gateway used for authority alerts.
    pub gateway: Arc<dyn NotificationGateway>,
    /// Retry policy applied to every alert.
    pub retry: RetryPolicy,
    /// Recipients of high and critical priority alerts.
    pub authority_numbers: Vec<String>,
    /// Artificial delay of the mock SMS endpoint.
    pub sms_delay: Duration,
    /// Page geometry for exported reports.
    pub report_layout: PageLayout,
}

impl AppState {
    /// Builds the state from a gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the configured gateway cannot be
    /// built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, NotificationError> {
        Ok(Self {
            registry: Arc::new(IncidentRegistry::load()),
            gateway: Arc::from(config.build_gateway()?),
            retry: config.retry,
            authority_numbers: config.authority_numbers.clone(),
            sms_delay: config.mock_delay,
            report_layout: PageLayout::default(),
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/incidents", web::get().to(handlers::list_incidents))
            .route("/incidents", web::post().to(handlers::create_incident))
            .route("/incidents/{id}", web::get().to(handlers::get_incident))
            .route("/incidents/{id}/fields", web::get().to(handlers::incident_fields))
            .route("/incidents/{id}/deploy", web::post().to(handlers::deploy))
            .route("/incidents/{id}/report", web::post().to(handlers::report))
            .route("/dispatch/plan", web::post().to(handlers::dispatch_plan))
            .route("/units/{service}", web::get().to(handlers::units))
            .route(
                "/notifications/send-sms",
                web::post().to(handlers::send_sms),
            ),
    );
}

/// Starts the API server.
///
/// Reads the gateway configuration from the environment, loads the
/// incident fixtures and starts the Actix-Web HTTP server on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the gateway configuration is
/// invalid, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    // The CLI installs its own logger before starting the server.
    let _ = pretty_env_logger::try_init_custom_env("RUST_LOG");

    log::info!("Loading gateway configuration...");
    let config = GatewayConfig::from_env().map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState::from_config(&config).map_err(std::io::Error::other)?);
    log::info!(
        "Loaded {} incidents; alerts go through the {} gateway",
        state.registry.len(),
        state.gateway.name()
    );

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
