#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SMS notification delivery for high-priority incidents.
//!
//! Delivery goes through the [`NotificationGateway`] trait so the HTTP
//! gateway and the in-process logging gateway are interchangeable.
//! [`retry::deliver`] wraps any gateway with a per-attempt timeout and
//! exponential backoff, and reports [`NotificationError::DeliveryFailed`]
//! once the retry budget is spent.

pub mod config;
pub mod gateway;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use highway_ers_incident_models::Priority;
use serde::{Deserialize, Serialize};

pub use config::GatewayConfig;
pub use gateway::{HttpSmsGateway, LoggingGateway};
pub use retry::{RetryPolicy, deliver};

/// Errors that can occur while delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// HTTP request to the gateway failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway did not answer within the attempt timeout.
    #[error("Gateway timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The gateway answered but refused the notification.
    #[error("Gateway rejected notification: {message}")]
    Rejected {
        /// HTTP status, if the rejection came with one.
        status: Option<u16>,
        /// Gateway-provided reason.
        message: String,
        /// Whether sending the same notification again may succeed.
        retryable: bool,
    },

    /// Gateway configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// Every attempt failed.
    #[error("Notification delivery failed after {attempts} attempt(s): {last_error}")]
    DeliveryFailed {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        last_error: Box<Self>,
    },
}

impl NotificationError {
    /// Returns `true` if the error is likely transient and worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Timeout { .. } => true,
            Self::Rejected { retryable, .. } => *retryable,
            Self::Config { .. } | Self::DeliveryFailed { .. } => false,
        }
    }
}

/// An SMS to send to a list of phone numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsNotification {
    pub phone_numbers: Vec<String>,
    pub message: String,
    pub priority: Priority,
}

/// Acknowledgement returned by a gateway for one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsReceipt {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A receipt plus the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub receipt: SmsReceipt,
    pub attempts: u32,
}

/// Something that can deliver an [`SmsNotification`].
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Short identifier used in logs (e.g. `"http"`).
    fn name(&self) -> &str;

    /// Sends one notification, without retrying.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the gateway fails or refuses the
    /// notification.
    async fn send(&self, notification: &SmsNotification) -> Result<SmsReceipt, NotificationError>;
}
