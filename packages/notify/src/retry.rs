//! Timeout and retry around a [`NotificationGateway`].
//!
//! Every notification should go out through [`deliver`] rather than
//! calling [`NotificationGateway::send`] directly, so that a slow or
//! flaky gateway gets a bounded number of attempts with exponential
//! backoff and callers see a single [`NotificationError::DeliveryFailed`]
//! when it never succeeds.

use std::time::Duration;

use crate::{DeliveryReceipt, NotificationError, NotificationGateway, SmsNotification};

/// Retries after the first attempt, unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Backoff before the first retry; doubles on each further retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on a single gateway attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// How hard [`deliver`] tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Retry `n` waits `base_delay * 2^(n-1)`.
    pub base_delay: Duration,
    /// Time allowed for each individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << retry.saturating_sub(1).min(16))
    }
}

/// Sends `notification` through `gateway`, retrying transient failures.
///
/// Each attempt is bounded by [`RetryPolicy::attempt_timeout`]. Permanent
/// failures (e.g. an HTTP 4xx other than 429) stop immediately.
///
/// # Errors
///
/// Returns [`NotificationError::DeliveryFailed`] carrying the number of
/// attempts and the last error once every attempt has failed, or on the
/// first permanent failure.
pub async fn deliver(
    gateway: &dyn NotificationGateway,
    notification: &SmsNotification,
    policy: &RetryPolicy,
) -> Result<DeliveryReceipt, NotificationError> {
    let mut attempts = 0;

    loop {
        if attempts > 0 {
            let delay = policy.backoff(attempts);
            log::warn!(
                "  retry {attempts}/{} via {} gateway in {delay:?}...",
                policy.max_retries,
                gateway.name()
            );
            tokio::time::sleep(delay).await;
        }
        attempts += 1;

        let result = tokio::time::timeout(policy.attempt_timeout, gateway.send(notification))
            .await
            .unwrap_or(Err(NotificationError::Timeout {
                after: policy.attempt_timeout,
            }));

        match result {
            Ok(receipt) => {
                log::debug!(
                    "Notification delivered via {} gateway after {attempts} attempt(s)",
                    gateway.name()
                );
                return Ok(DeliveryReceipt { receipt, attempts });
            }
            Err(e) if e.is_transient() && attempts <= policy.max_retries => {
                log::warn!("  transient notification error: {e}");
            }
            Err(e) => {
                log::error!(
                    "Notification delivery via {} gateway failed after {attempts} attempt(s): {e}",
                    gateway.name()
                );
                return Err(NotificationError::DeliveryFailed {
                    attempts,
                    last_error: Box::new(e),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SmsReceipt;
    use async_trait::async_trait;
    use chrono::Utc;
    use highway_ers_incident_models::Priority;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Clone, Copy)]
    enum Outcome {
        Ok,
        Transient,
        Permanent,
        Hang,
    }

    /// Plays back a fixed list of outcomes; succeeds once exhausted.
    struct ScriptedGateway {
        script: Mutex<VecDeque<Outcome>>,
        calls: AtomicU32,
    }

    impl ScriptedGateway {
        fn new(script: &[Outcome]) -> Self {
            Self {
                script: Mutex::new(script.iter().copied().collect()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationGateway for ScriptedGateway {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, _: &SmsNotification) -> Result<SmsReceipt, NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front().unwrap_or(Outcome::Ok);
            match next {
                Outcome::Ok => Ok(SmsReceipt {
                    message: "sent".to_string(),
                    timestamp: Utc::now(),
                }),
                Outcome::Transient => Err(NotificationError::Rejected {
                    status: Some(503),
                    message: "unavailable".to_string(),
                    retryable: true,
                }),
                Outcome::Permanent => Err(NotificationError::Rejected {
                    status: Some(400),
                    message: "bad request".to_string(),
                    retryable: false,
                }),
                Outcome::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    unreachable!("attempt should have timed out")
                }
            }
        }
    }

    fn notification() -> SmsNotification {
        SmsNotification {
            phone_numbers: vec!["+1234567890".to_string()],
            message: "HIGH PRIORITY EMERGENCY: FIRE incident reported.".to_string(),
            priority: Priority::Critical,
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            attempt_timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn first_success_needs_one_attempt() {
        let gateway = ScriptedGateway::new(&[]);
        let receipt = deliver(&gateway, &notification(), &fast_policy(2))
            .await
            .unwrap();
        assert_eq!(receipt.attempts, 1);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let gateway = ScriptedGateway::new(&[Outcome::Transient, Outcome::Transient]);
        let receipt = deliver(&gateway, &notification(), &fast_policy(2))
            .await
            .unwrap();
        assert_eq!(receipt.attempts, 3);
        assert_eq!(receipt.receipt.message, "sent");
    }

    #[tokio::test]
    async fn gives_up_after_retry_budget() {
        let gateway = ScriptedGateway::new(&[Outcome::Transient; 5]);
        let err = deliver(&gateway, &notification(), &fast_policy(1))
            .await
            .unwrap_err();
        match err {
            NotificationError::DeliveryFailed {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last_error, NotificationError::Rejected { .. }));
            }
            other => panic!("expected DeliveryFailed, got {other:?}"),
        }
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn permanent_rejection_is_not_retried() {
        let gateway = ScriptedGateway::new(&[Outcome::Permanent]);
        let err = deliver(&gateway, &notification(), &fast_policy(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotificationError::DeliveryFailed { attempts: 1, .. }
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn hanging_gateway_times_out_then_retries() {
        let gateway = ScriptedGateway::new(&[Outcome::Hang]);
        let receipt = deliver(&gateway, &notification(), &fast_policy(1))
            .await
            .unwrap();
        assert_eq!(receipt.attempts, 2);
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(500),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
    }

    #[test]
    fn default_policy_retries_at_least_once() {
        assert!(RetryPolicy::default().max_retries >= 1);
    }
}
