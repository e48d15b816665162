#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dispatch rules for the highway emergency response system.
//!
//! Everything here is a pure function over small, closed domains:
//!
//! * [`resolver`] decides which units and ETAs each requested service
//!   gets, and which authorities are notified for a given priority.
//! * [`fields`] decides which category-specific fields an incident report
//!   shows, and what each field falls back to when absent.
//! * [`coordination`] holds the command structure, channels and
//!   follow-up rules for a coordinated incident.
//! * [`form`] is the dispatch form as immutable state plus a reducer.

pub mod coordination;
pub mod fields;
pub mod form;
pub mod resolver;

pub use coordination::{AuthorityAlert, CoordinationProtocol, authority_alert, landing_service};
pub use fields::{FieldSet, FieldSpec, ResolvedField, resolve_fields, select_fields};
pub use form::{CasualtyEstimate, DispatchForm, DispatchPlan, FormAction, reduce};
pub use resolver::{
    DispatchSummary, NotificationChain, NotificationRecipient, ServiceDispatch, ServiceSelection,
    UrgencyBand, resolve,
};
