#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the highway emergency response system.
//!
//! Every operation is available as a subcommand. Running without one
//! starts an interactive menu that walks the dispatcher through creating
//! a coordinated incident, browsing incidents, exporting a report,
//! deploying units or starting the API server.

mod interactive;
mod output;

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use clap::{Parser, Subcommand};
use highway_ers_dispatch::{
    DispatchForm, ServiceSelection, authority_alert, resolve_fields, select_fields,
};
use highway_ers_incident::{IncidentRegistry, deploy_units};
use highway_ers_incident_models::{IncidentType, Priority, Service};
use highway_ers_notify::{GatewayConfig, SmsNotification, deliver};
use highway_ers_report::{PageLayout, ReportInput, build_report, save_report};

#[derive(Parser)]
#[command(name = "highway_ers", about = "Highway emergency response toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dispatch summary and notification chain for an incident
    Resolve {
        /// Comma-separated services to dispatch (police, ems, fire)
        #[arg(long, value_delimiter = ',', value_parser = parse_enum::<Service>)]
        services: Vec<Service>,
        /// Incident priority (low, medium, high, critical)
        #[arg(long, default_value = "high", value_parser = parse_enum::<Priority>)]
        priority: Priority,
        /// Kind of emergency, which decides the command structure
        #[arg(long, default_value = "accident", value_parser = parse_enum::<IncidentType>)]
        incident_type: IncidentType,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the additional report fields for an incident id
    Fields {
        /// Incident id (e.g. "MED-1234")
        id: String,
    },
    /// List incidents
    Incidents {
        /// Only incidents on this service's dashboard
        #[arg(long, value_parser = parse_enum::<Service>)]
        service: Option<Service>,
        /// Only unresolved incidents
        #[arg(long)]
        active: bool,
    },
    /// Export an incident report as paginated text
    Report {
        /// Incident id
        id: String,
        /// Free-text notes appended to the report
        #[arg(long)]
        notes: Option<String>,
        /// Name of the reporting officer
        #[arg(long)]
        officer: Option<String>,
        /// Badge number of the reporting officer
        #[arg(long)]
        badge: Option<String>,
        /// Directory to write the report into
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Wrap column
        #[arg(long, default_value = "170")]
        width: usize,
        /// Page height in lines, footer included
        #[arg(long, default_value = "60")]
        lines_per_page: usize,
    },
    /// Send the authority SMS alert for an incident type and priority
    Notify {
        #[arg(long, default_value = "accident", value_parser = parse_enum::<IncidentType>)]
        incident_type: IncidentType,
        #[arg(long, default_value = "high", value_parser = parse_enum::<Priority>)]
        priority: Priority,
        /// Comma-separated phone numbers (overrides `AUTHORITY_PHONE_NUMBERS`)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },
    /// Deploy units to an incident
    Deploy {
        /// Incident id
        id: String,
        /// Service the units belong to
        #[arg(long, value_parser = parse_enum::<Service>)]
        service: Service,
        /// Comma-separated unit names (e.g. "Engine 1,Tanker 2")
        #[arg(long, value_delimiter = ',')]
        units: Vec<String>,
    },
    /// Start the API server
    Serve,
}

/// Parses a case-insensitive enum argument such as `--priority Critical`.
fn parse_enum<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid value '{value}': {e}"))
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Resolve {
            services,
            priority,
            incident_type,
            json,
        } => {
            let form = DispatchForm {
                incident_type,
                priority,
                services: ServiceSelection::of(&services),
                ..DispatchForm::default()
            };
            let plan = form.plan();
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Commands::Fields { id } => {
            let registry = IncidentRegistry::load();
            match registry.get(&id) {
                Ok(incident) => output::print_fields(&resolve_fields(incident)),
                Err(e) => {
                    log::debug!("{e}; showing placeholders");
                    output::print_field_set(&select_fields(&id));
                }
            }
        }
        Commands::Incidents { service, active } => {
            let registry = IncidentRegistry::load();
            output::print_incident_table(
                registry
                    .all()
                    .iter()
                    .filter(|i| service.is_none_or(|s| i.primary_service() == s))
                    .filter(|i| !active || i.is_active()),
            );
        }
        Commands::Report {
            id,
            notes,
            officer,
            badge,
            out,
            width,
            lines_per_page,
        } => {
            let registry = IncidentRegistry::load();
            let incident = registry.get(&id)?;
            let input = ReportInput {
                additional_notes: notes.unwrap_or_default(),
                reporting_officer: officer.unwrap_or_default(),
                badge_number: badge.unwrap_or_default(),
            };
            let report = build_report(incident, &input, Utc::now());
            let layout = PageLayout {
                width,
                lines_per_page,
            };
            let path = save_report(&report, layout, &out)?;
            println!("Report saved to {}", path.display());
        }
        Commands::Notify {
            incident_type,
            priority,
            to,
        } => {
            let config = GatewayConfig::from_env()?;
            let numbers = if to.is_empty() {
                config.authority_numbers.clone()
            } else {
                to
            };

            let Some(alert) = authority_alert(incident_type, priority, &numbers) else {
                println!("{priority} priority incidents do not alert the authorities.");
                return Ok(());
            };

            let gateway = config.build_gateway()?;
            let delivery = deliver(
                gateway.as_ref(),
                &SmsNotification {
                    phone_numbers: alert.phone_numbers,
                    message: alert.message,
                    priority: alert.priority,
                },
                &config.retry,
            )
            .await?;
            println!(
                "{} (after {} attempt(s))",
                delivery.receipt.message, delivery.attempts
            );
        }
        Commands::Deploy { id, service, units } => {
            let registry = IncidentRegistry::load();
            let incident = registry.get(&id)?;
            let deployment = deploy_units(incident, service, &units)?;
            println!(
                "Deployed {} to {} at {}",
                deployment.units.join(", "),
                deployment.incident_id,
                deployment.deployed_at.format("%H:%M:%S")
            );
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(highway_ers_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_arguments_ignore_case() {
        let cli = Cli::try_parse_from([
            "highway_ers",
            "resolve",
            "--services",
            "Police,EMS",
            "--priority",
            "Critical",
            "--incident-type",
            "FIRE",
        ])
        .unwrap();
        let Some(Commands::Resolve {
            services,
            priority,
            incident_type,
            ..
        }) = cli.command
        else {
            panic!("expected resolve");
        };
        assert_eq!(services, vec![Service::Police, Service::Ems]);
        assert_eq!(priority, Priority::Critical);
        assert_eq!(incident_type, IncidentType::Fire);
    }

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["highway_ers", "notify"]).unwrap();
        let Some(Commands::Notify {
            incident_type,
            priority,
            to,
        }) = cli.command
        else {
            panic!("expected notify");
        };
        assert_eq!(incident_type, IncidentType::Accident);
        assert_eq!(priority, Priority::High);
        assert!(to.is_empty());
    }

    #[test]
    fn unknown_priority_is_rejected() {
        assert!(Cli::try_parse_from(["highway_ers", "resolve", "--priority", "urgent"]).is_err());
    }

    #[test]
    fn deploy_takes_a_service() {
        let cli = Cli::try_parse_from([
            "highway_ers",
            "deploy",
            "FIRE-1234",
            "--service",
            "fire",
            "--units",
            "Engine 1,Tanker 2",
        ])
        .unwrap();
        let Some(Commands::Deploy { id, service, units }) = cli.command else {
            panic!("expected deploy");
        };
        assert_eq!(id, "FIRE-1234");
        assert_eq!(service, Service::Fire);
        assert_eq!(units, vec!["Engine 1", "Tanker 2"]);
    }
}
