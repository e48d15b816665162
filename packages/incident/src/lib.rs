#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident fixtures, unit roster and unit deployment.
//!
//! The incidents shown on the police, EMS and fire dashboards are static
//! fixtures embedded at compile time (see [`registry`]). Lookups report
//! [`IncidentError::NotFound`] instead of falling back to a default
//! incident.

pub mod deploy;
pub mod registry;
pub mod roster;

pub use deploy::{DeployError, Deployment, deploy_units};
pub use registry::{IncidentRegistry, all_incidents};

/// Errors that can occur when looking up incidents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncidentError {
    /// No incident with the given id exists.
    #[error("Incident not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },
}
