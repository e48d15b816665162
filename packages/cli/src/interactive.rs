//! Interactive menu for dispatchers.
//!
//! Builds the coordinated incident form one answer at a time through
//! [`reduce`], so every prompt is a single [`FormAction`].

use std::path::PathBuf;

use chrono::Utc;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use highway_ers_dispatch::{
    CasualtyEstimate, DispatchForm, FormAction, authority_alert, landing_service, reduce,
    resolve_fields,
};
use highway_ers_incident::roster::deployable_units;
use highway_ers_incident::{IncidentRegistry, deploy_units};
use highway_ers_incident_models::{Incident, IncidentType, Priority, Service};
use highway_ers_notify::{GatewayConfig, SmsNotification, deliver};
use highway_ers_report::{PageLayout, ReportInput, build_report, save_report};

use crate::output;

/// Top-level actions available in the interactive menu.
enum Action {
    CreateIncident,
    BrowseIncidents,
    ExportReport,
    DeployUnits,
    StartServer,
}

impl Action {
    const ALL: &[Self] = &[
        Self::CreateIncident,
        Self::BrowseIncidents,
        Self::ExportReport,
        Self::DeployUnits,
        Self::StartServer,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::CreateIncident => "Create coordinated incident",
            Self::BrowseIncidents => "Browse incidents",
            Self::ExportReport => "Export incident report",
            Self::DeployUnits => "Deploy units",
            Self::StartServer => "Start API server",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Highway Emergency Response System");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::CreateIncident => create_incident().await?,
        Action::BrowseIncidents => browse_incidents()?,
        Action::ExportReport => export_report()?,
        Action::DeployUnits => deploy()?,
        Action::StartServer => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(highway_ers_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}

async fn create_incident() -> Result<(), Box<dyn std::error::Error>> {
    let mut form = DispatchForm::default();

    let types = IncidentType::all();
    let labels: Vec<&str> = types.iter().map(|t| t.label()).collect();
    let idx = Select::new()
        .with_prompt("Incident type")
        .items(&labels)
        .default(types.iter().position(|t| *t == form.incident_type).unwrap_or(0))
        .interact()?;
    form = reduce(
        &form,
        FormAction::SetIncidentType {
            incident_type: types[idx],
        },
    );

    // Most severe first.
    let priorities: Vec<Priority> = Priority::all().iter().rev().copied().collect();
    let labels: Vec<String> = priorities
        .iter()
        .map(|p| format!("{p} - {}", p.description()))
        .collect();
    let idx = Select::new()
        .with_prompt("Priority")
        .items(&labels)
        .default(priorities.iter().position(|p| *p == form.priority).unwrap_or(0))
        .interact()?;
    form = reduce(
        &form,
        FormAction::SetPriority {
            priority: priorities[idx],
        },
    );

    let services = Service::all();
    let labels: Vec<&str> = services.iter().map(|s| s.label()).collect();
    let defaults: Vec<bool> = services
        .iter()
        .map(|s| form.services.contains(*s))
        .collect();
    let chosen = MultiSelect::new()
        .with_prompt("Services to dispatch (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;
    form = form.apply_all(services.iter().enumerate().map(|(i, service)| {
        FormAction::ToggleService {
            service: *service,
            selected: chosen.contains(&i),
        }
    }));

    let location: String = Input::new()
        .with_prompt("Location")
        .allow_empty(true)
        .interact_text()?;
    form = reduce(&form, FormAction::SetLocation { location });

    let estimates = CasualtyEstimate::all();
    let labels: Vec<&str> = estimates.iter().map(|c| c.label()).collect();
    let idx = Select::new()
        .with_prompt("Estimated casualties")
        .items(&labels)
        .default(0)
        .interact()?;
    form = reduce(
        &form,
        FormAction::SetCasualties {
            casualties: estimates[idx],
        },
    );

    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;
    form = reduce(&form, FormAction::SetDescription { description });

    output::print_plan(&form.plan());
    println!();

    let config = GatewayConfig::from_env()?;
    if let Some(alert) =
        authority_alert(form.incident_type, form.priority, &config.authority_numbers)
    {
        if Confirm::new()
            .with_prompt(format!(
                "Send authority alert to {} contact(s)?",
                alert.phone_numbers.len()
            ))
            .default(true)
            .interact()?
        {
            let gateway = config.build_gateway()?;
            let notification = SmsNotification {
                phone_numbers: alert.phone_numbers,
                message: alert.message,
                priority: alert.priority,
            };
            match deliver(gateway.as_ref(), &notification, &config.retry).await {
                Ok(delivery) => println!("{}", delivery.receipt.message),
                Err(e) => println!("Authority alert failed: {e}"),
            }
        }
    }

    match landing_service(form.services) {
        Some(service) => println!("Incident created. Opening the {} dashboard.", service.label()),
        None => println!("Incident created."),
    }

    Ok(())
}

/// Prompts for one incident, optionally only from one service's dashboard.
fn pick_incident<'a>(
    registry: &'a IncidentRegistry,
    service: Option<Service>,
) -> Result<&'a Incident, Box<dyn std::error::Error>> {
    let incidents: Vec<&Incident> = registry
        .all()
        .iter()
        .filter(|i| service.is_none_or(|s| i.primary_service() == s))
        .collect();
    let labels: Vec<String> = incidents
        .iter()
        .map(|i| format!("{} - {} ({})", i.id, i.incident_type, i.location))
        .collect();

    let idx = Select::new()
        .with_prompt("Incident")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(incidents[idx])
}

fn pick_service(prompt: &str) -> Result<Service, Box<dyn std::error::Error>> {
    let services = Service::all();
    let labels: Vec<&str> = services.iter().map(|s| s.label()).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(services[idx])
}

fn browse_incidents() -> Result<(), Box<dyn std::error::Error>> {
    let registry = IncidentRegistry::load();
    let service = pick_service("Dashboard")?;

    output::print_incident_table(registry.for_service(service));
    println!();

    let incident = pick_incident(&registry, Some(service))?;
    println!();
    output::print_incident(incident, &resolve_fields(incident));
    Ok(())
}

fn export_report() -> Result<(), Box<dyn std::error::Error>> {
    let registry = IncidentRegistry::load();
    let incident = pick_incident(&registry, None)?;

    let additional_notes: String = Input::new()
        .with_prompt("Additional notes")
        .allow_empty(true)
        .interact_text()?;
    let reporting_officer: String = Input::new()
        .with_prompt("Reporting officer")
        .allow_empty(true)
        .interact_text()?;
    let badge_number: String = Input::new()
        .with_prompt("Badge number")
        .allow_empty(true)
        .interact_text()?;
    let out: String = Input::new()
        .with_prompt("Output directory")
        .default(".".to_string())
        .interact_text()?;

    let report = build_report(
        incident,
        &ReportInput {
            additional_notes,
            reporting_officer,
            badge_number,
        },
        Utc::now(),
    );
    let path = save_report(&report, PageLayout::default(), &PathBuf::from(out))?;
    println!("Report saved to {}", path.display());
    Ok(())
}

fn deploy() -> Result<(), Box<dyn std::error::Error>> {
    let registry = IncidentRegistry::load();
    let incident = pick_incident(&registry, None)?;
    let service = pick_service("Deploy units from")?;

    let roster = deployable_units(service);
    let chosen = MultiSelect::new()
        .with_prompt("Units (space to toggle)")
        .items(roster)
        .interact()?;
    let units: Vec<String> = chosen.iter().map(|&i| roster[i].to_string()).collect();

    match deploy_units(incident, service, &units) {
        Ok(deployment) => println!(
            "Deployed {} to {}",
            deployment.units.join(", "),
            deployment.incident_id
        ),
        Err(e) => println!("Deployment rejected: {e}"),
    }
    Ok(())
}
