//! Gateway configuration from environment variables.
//!
//! | Variable                  | Default                     |
//! |---------------------------|-----------------------------|
//! | `SMS_GATEWAY_URL`         | unset: logging gateway      |
//! | `SMS_TIMEOUT_SECS`        | `10`                        |
//! | `SMS_MAX_RETRIES`         | `2`                         |
//! | `SMS_RETRY_BASE_MS`       | `500`                       |
//! | `SMS_MOCK_DELAY_MS`       | `1000`                      |
//! | `AUTHORITY_PHONE_NUMBERS` | `+1234567890,+1987654321`   |

use std::str::FromStr;
use std::time::Duration;

use crate::gateway::{HttpSmsGateway, LoggingGateway};
use crate::retry::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy};
use crate::{NotificationError, NotificationGateway};

/// High authority contacts alerted for high and critical incidents.
pub const DEFAULT_AUTHORITY_NUMBERS: &[&str] = &["+1234567890", "+1987654321"];

/// Delay of the logging gateway, mimicking a real SMS round trip.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1000);

/// Everything needed to build a gateway and deliver through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// SMS HTTP endpoint. `None` selects the [`LoggingGateway`].
    pub gateway_url: Option<String>,
    pub retry: RetryPolicy,
    pub mock_delay: Duration,
    pub authority_numbers: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_url: None,
            retry: RetryPolicy::default(),
            mock_delay: DEFAULT_MOCK_DELAY,
            authority_numbers: DEFAULT_AUTHORITY_NUMBERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl GatewayConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Config`] if a numeric variable is set
    /// but does not parse.
    pub fn from_env() -> Result<Self, NotificationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Config`] if a numeric variable is set
    /// but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NotificationError> {
        let gateway_url = lookup("SMS_GATEWAY_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout = parse_var(&lookup, "SMS_TIMEOUT_SECS")?
            .map_or(DEFAULT_ATTEMPT_TIMEOUT, Duration::from_secs);
        let max_retries = parse_var(&lookup, "SMS_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);
        let base_delay = parse_var(&lookup, "SMS_RETRY_BASE_MS")?
            .map_or(DEFAULT_BASE_DELAY, Duration::from_millis);
        let mock_delay = parse_var(&lookup, "SMS_MOCK_DELAY_MS")?
            .map_or(DEFAULT_MOCK_DELAY, Duration::from_millis);

        let authority_numbers = lookup("AUTHORITY_PHONE_NUMBERS").map_or_else(
            || Self::default().authority_numbers,
            |value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        );

        Ok(Self {
            gateway_url,
            retry: RetryPolicy {
                max_retries,
                base_delay,
                attempt_timeout: timeout,
            },
            mock_delay,
            authority_numbers,
        })
    }

    /// Builds the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the HTTP client cannot be built.
    pub fn build_gateway(&self) -> Result<Box<dyn NotificationGateway>, NotificationError> {
        match &self.gateway_url {
            Some(url) => {
                log::info!("Using HTTP SMS gateway at {url}");
                Ok(Box::new(HttpSmsGateway::new(
                    url.clone(),
                    self.retry.attempt_timeout,
                )?))
            }
            None => {
                log::info!("SMS_GATEWAY_URL not set; notifications will only be logged");
                Ok(Box::new(LoggingGateway::new(self.mock_delay)))
            }
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, NotificationError> {
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|_| NotificationError::Config {
                message: format!("{key} must be a non-negative integer, got '{value}'"),
            })
        })
        .transpose()
}
