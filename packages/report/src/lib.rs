#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident report export.
//!
//! [`build_report`] turns an [`Incident`] and the operator's input into a
//! [`Report`] whose sections always appear in the same order. The
//! [`layout`] module wraps and paginates a report into plain text.

pub mod layout;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use highway_ers_dispatch::resolve_fields;
use highway_ers_incident_models::Incident;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

pub use layout::{Page, PageLayout, join_pages, render_pages, render_text};

/// Shown when the operator leaves the officer or badge blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Title printed at the top of every report.
pub const REPORT_TITLE: &str = "HIGHWAY INCIDENT REPORT";

/// Errors that can occur while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The page layout cannot hold a report.
    #[error("Render error: {message}")]
    Render {
        /// Description.
        message: String,
    },

    /// Writing the rendered report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Free-text fields the operator fills in before exporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInput {
    pub additional_notes: String,
    pub reporting_officer: String,
    pub badge_number: String,
}

/// Report sections, in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[strum(serialize = "Incident Details")]
    Header,
    #[strum(serialize = "Description")]
    Description,
    #[strum(serialize = "Responding Units")]
    RespondingUnits,
    #[strum(serialize = "Actions Taken")]
    ActionsTaken,
    #[strum(serialize = "Additional Information")]
    AdditionalInformation,
    #[strum(serialize = "Additional Notes")]
    AdditionalNotes,
    #[strum(serialize = "Report Certification")]
    Signatory,
}

/// One titled block of report text. Each entry of `lines` is a logical
/// line that may be wrapped when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

impl ReportSection {
    #[must_use]
    pub fn title(&self) -> String {
        self.kind.to_string()
    }
}

/// A report ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub incident_id: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Suggested file name for the exported report.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("incident-report-{}.txt", self.incident_id)
    }

    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}

fn or_not_specified(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

/// Assembles the report for `incident`.
///
/// The notes section is left out when `input.additional_notes` is blank.
#[must_use]
pub fn build_report(incident: &Incident, input: &ReportInput, generated_at: DateTime<Utc>) -> Report {
    let mut sections = Vec::with_capacity(7);

    sections.push(ReportSection {
        kind: SectionKind::Header,
        lines: vec![
            format!("Incident ID: {}", incident.id),
            format!("Type: {}", incident.incident_type),
            format!("Location: {}", incident.location),
            format!("Date/Time: {}", incident.date_time()),
            format!("Priority: {}", incident.priority),
            format!("Status: {}", incident.status),
            format!(
                "Coordinates: {:.6}, {:.6}",
                incident.coordinates.lat, incident.coordinates.lng
            ),
        ],
    });

    sections.push(ReportSection {
        kind: SectionKind::Description,
        lines: vec![incident.description.clone()],
    });

    sections.push(ReportSection {
        kind: SectionKind::RespondingUnits,
        lines: if incident.responders.is_empty() {
            vec!["No units assigned".to_string()]
        } else {
            incident.responders.iter().map(|r| format!("- {r}")).collect()
        },
    });

    sections.push(ReportSection {
        kind: SectionKind::ActionsTaken,
        lines: if incident.actions.is_empty() {
            vec!["No actions recorded".to_string()]
        } else {
            incident
                .actions
                .iter()
                .map(|a| format!("{} - {} ({})", a.time, a.action, a.by))
                .collect()
        },
    });

    sections.push(ReportSection {
        kind: SectionKind::AdditionalInformation,
        lines: resolve_fields(incident)
            .into_iter()
            .map(|f| format!("{}: {}", f.label, f.value))
            .collect(),
    });

    let notes = input.additional_notes.trim();
    if !notes.is_empty() {
        sections.push(ReportSection {
            kind: SectionKind::AdditionalNotes,
            lines: notes.lines().map(str::to_string).collect(),
        });
    }

    sections.push(ReportSection {
        kind: SectionKind::Signatory,
        lines: vec![
            format!(
                "Reporting Officer: {}",
                or_not_specified(&input.reporting_officer)
            ),
            format!("Badge Number: {}", or_not_specified(&input.badge_number)),
            format!(
                "Report Generated: {}",
                generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ],
    });

    log::debug!(
        "Built report for {} with {} sections",
        incident.id,
        sections.len()
    );

    Report {
        incident_id: incident.id.clone(),
        generated_at,
        sections,
    }
}

/// Renders `report` and writes it to `dir` under [`Report::filename`].
///
/// # Errors
///
/// Returns [`ReportError`] if the layout is invalid or the file cannot
/// be written.
pub fn save_report(report: &Report, layout: PageLayout, dir: &Path) -> Result<PathBuf, ReportError> {
    let text = render_text(report, layout)?;
    let path = dir.join(report.filename());
    std::fs::write(&path, text)?;
    log::info!("Wrote report for {} to {}", report.incident_id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use highway_ers_incident::IncidentRegistry;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 28, 12, 0, 0).unwrap()
    }

    fn report_for(id: &str, input: &ReportInput) -> Report {
        let registry = IncidentRegistry::load();
        build_report(registry.get(id).unwrap(), input, generated_at())
    }

    #[test]
    fn sections_follow_fixed_order() {
        let input = ReportInput {
            additional_notes: "Lane 2 reopened at 11:30.".to_string(),
            ..ReportInput::default()
        };
        let report = report_for("FIRE-1234", &input);
        assert_eq!(
            report.kinds(),
            vec![
                SectionKind::Header,
                SectionKind::Description,
                SectionKind::RespondingUnits,
                SectionKind::ActionsTaken,
                SectionKind::AdditionalInformation,
                SectionKind::AdditionalNotes,
                SectionKind::Signatory,
            ]
        );
        assert!(report.kinds().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn blank_notes_are_omitted() {
        let input = ReportInput {
            additional_notes: "   \n ".to_string(),
            ..ReportInput::default()
        };
        let report = report_for("INC-1234", &input);
        assert!(report.section(SectionKind::AdditionalNotes).is_none());
        assert_eq!(report.sections.len(), 6);
    }

    #[test]
    fn missing_officer_and_badge_read_not_specified() {
        let report = report_for("MED-1234", &ReportInput::default());
        let signatory = report.section(SectionKind::Signatory).unwrap();
        assert_eq!(signatory.lines[0], "Reporting Officer: Not specified");
        assert_eq!(signatory.lines[1], "Badge Number: Not specified");
        assert_eq!(signatory.lines[2], "Report Generated: 2023-04-28 12:00:00 UTC");
    }

    #[test]
    fn officer_is_printed_when_given() {
        let input = ReportInput {
            reporting_officer: "Michael Chen".to_string(),
            badge_number: "4521".to_string(),
            ..ReportInput::default()
        };
        let report = report_for("MED-1234", &input);
        let signatory = report.section(SectionKind::Signatory).unwrap();
        assert_eq!(signatory.lines[0], "Reporting Officer: Michael Chen");
        assert_eq!(signatory.lines[1], "Badge Number: 4521");
    }

    #[test]
    fn actions_are_formatted_with_actor() {
        let report = report_for("FIRE-1234", &ReportInput::default());
        let actions = report.section(SectionKind::ActionsTaken).unwrap();
        assert_eq!(
            actions.lines[0],
            "10:25 AM - Fire units dispatched to scene (Dispatcher: Alex Morgan)"
        );
    }

    #[test]
    fn additional_information_uses_category_fields() {
        let report = report_for("FIRE-1234", &ReportInput::default());
        let info = report.section(SectionKind::AdditionalInformation).unwrap();
        assert!(info.lines.iter().any(|l| l == "Fire Type: Class B - Flammable liquid"));
    }

    #[test]
    fn save_writes_named_file() {
        let report = report_for("MED-1235", &ReportInput::default());
        let dir = std::env::temp_dir();
        let path = save_report(&report, PageLayout::default(), &dir).unwrap();
        assert!(path.ends_with("incident-report-MED-1235.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Page 1 of 1"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn filename_uses_incident_id() {
        let report = report_for("INC-1235", &ReportInput::default());
        assert_eq!(report.filename(), "incident-report-INC-1235.txt");
    }
}
