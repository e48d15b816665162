//! Terminal formatting shared by the subcommands and interactive mode.

use highway_ers_dispatch::{DispatchPlan, FieldSet, ResolvedField};
use highway_ers_incident_models::Incident;

pub fn print_plan(plan: &DispatchPlan) {
    println!();
    println!("Response Summary");
    println!("{}", "-".repeat(50));
    if plan.summary.is_empty() {
        println!("No services selected.");
    }
    for (service, dispatch) in plan.summary.iter() {
        println!(
            "{} (ETA {} min)",
            service.response_title(),
            dispatch.eta_minutes
        );
        for unit in &dispatch.units {
            println!("  {unit}");
        }
    }

    println!();
    println!("Notification Chain");
    println!("{}", "-".repeat(50));
    for recipient in plan.notification_chain.iter() {
        println!(
            "  [{:<8}] {}",
            recipient.urgency_band.as_ref(),
            recipient.recipient_role
        );
    }

    println!();
    println!("Coordination");
    println!("{}", "-".repeat(50));
    println!("  Command:  {}", plan.coordination.command);
    println!(
        "  Channels: {} (primary), {} (backup)",
        plan.coordination.primary_channel, plan.coordination.backup_channel
    );
    for point in plan.coordination.coordination_points {
        println!("  - {point}");
    }
}

pub fn print_incident_table<'a>(incidents: impl IntoIterator<Item = &'a Incident>) {
    println!(
        "{:<10} {:<18} {:<9} {:<12} LOCATION",
        "ID", "TYPE", "PRIORITY", "STATUS"
    );
    println!("{}", "-".repeat(80));
    for incident in incidents {
        println!(
            "{:<10} {:<18} {:<9} {:<12} {}",
            incident.id,
            incident.incident_type,
            incident.priority.to_string(),
            incident.status.to_string(),
            incident.location
        );
    }
}

pub fn print_incident(incident: &Incident, fields: &[ResolvedField]) {
    println!("{} - {}", incident.id, incident.incident_type);
    println!("  Location:  {}", incident.location);
    println!("  Date/Time: {}", incident.date_time());
    println!("  Priority:  {}", incident.priority);
    println!("  Status:    {}", incident.status);
    if !incident.responders.is_empty() {
        println!("  Units:     {}", incident.responders.join(", "));
    }
    println!("  {}", incident.description);
    println!();
    print_fields(fields);
}

pub fn print_fields(fields: &[ResolvedField]) {
    for field in fields {
        let marker = if field.defaulted { " (default)" } else { "" };
        println!("  {:<22} {}{marker}", format!("{}:", field.label), field.value);
    }
}

pub fn print_field_set(set: &FieldSet) {
    println!("{} fields", set.category);
    for spec in set.fields {
        println!(
            "  {:<22} placeholder \"{}\"",
            format!("{}:", spec.label),
            spec.placeholder
        );
    }
}
