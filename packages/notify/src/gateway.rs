//! Gateway implementations.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{NotificationError, NotificationGateway, SmsNotification, SmsReceipt};

/// Maximum length of a response body included in a rejection message.
const BODY_PREVIEW_LEN: usize = 200;

/// Posts notifications as JSON to an SMS HTTP endpoint.
///
/// The endpoint must accept `{phoneNumbers, message, priority}` and
/// answer `{success, message, timestamp}`.
pub struct HttpSmsGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSmsGateway {
    /// Creates a gateway for `endpoint` whose requests give up after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Http`] if the HTTP client cannot be
    /// built.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Response body of the SMS endpoint.
#[derive(Deserialize)]
struct GatewayResponse {
    success: bool,
    message: Option<String>,
    error: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

#[async_trait]
impl NotificationGateway for HttpSmsGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, notification: &SmsNotification) -> Result<SmsReceipt, NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await?;

        let status = response.status();

        // 429 and 5xx may clear up; any other 4xx is permanent.
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            let preview = if body.chars().count() > BODY_PREVIEW_LEN {
                format!("{}...", body.chars().take(BODY_PREVIEW_LEN).collect::<String>())
            } else {
                body
            };
            return Err(NotificationError::Rejected {
                status: Some(status.as_u16()),
                message: format!("HTTP {status}: {preview}"),
                retryable: status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error(),
            });
        }

        let body: GatewayResponse = response.json().await?;
        if !body.success {
            return Err(NotificationError::Rejected {
                status: Some(status.as_u16()),
                message: body
                    .error
                    .unwrap_or_else(|| "gateway reported failure".to_string()),
                retryable: true,
            });
        }

        Ok(SmsReceipt {
            message: body.message.unwrap_or_default(),
            timestamp: body.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

/// Logs notifications instead of sending them, after an artificial
/// delay. Always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct LoggingGateway {
    delay: Duration,
}

impl LoggingGateway {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for LoggingGateway {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl NotificationGateway for LoggingGateway {
    fn name(&self) -> &str {
        "logging"
    }

    async fn send(&self, notification: &SmsNotification) -> Result<SmsReceipt, NotificationError> {
        log::info!("[SMS NOTIFICATION] Priority: {}", notification.priority);
        log::info!("To: {}", notification.phone_numbers.join(", "));
        log::info!("Message: {}", notification.message);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(SmsReceipt {
            message: format!(
                "SMS notification sent to {} recipients",
                notification.phone_numbers.len()
            ),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use highway_ers_incident_models::Priority;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::{RetryPolicy, deliver};

    fn notification() -> SmsNotification {
        SmsNotification {
            phone_numbers: vec!["+1234567890".to_string()],
            message: "HIGH PRIORITY EMERGENCY".to_string(),
            priority: Priority::Critical,
        }
    }

    /// Reads one request, headers and body, so the client sees a clean
    /// response.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        if key.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    /// Starts a local SMS endpoint that answers every request with
    /// `status` and `body`. Returns its URL and a request counter.
    async fn endpoint(status: &'static str, body: &'static str) -> (String, Arc<AtomicU32>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/api/notifications/send-sms"), hits)
    }

    async fn send_to(status: &'static str, body: &'static str) -> Result<SmsReceipt, NotificationError> {
        let (url, _) = endpoint(status, body).await;
        HttpSmsGateway::new(url, Duration::from_secs(5))
            .unwrap()
            .send(&notification())
            .await
    }

    #[tokio::test]
    async fn http_success_returns_endpoint_message() {
        let receipt = send_to(
            "200 OK",
            r#"{"success":true,"message":"SMS notification sent to 1 recipients","timestamp":"2024-05-01T12:00:00Z"}"#,
        )
        .await
        .unwrap();
        assert_eq!(receipt.message, "SMS notification sent to 1 recipients");
        assert_eq!(receipt.timestamp.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn http_client_error_is_permanent() {
        let err = send_to("400 Bad Request", r#"{"error":"bad number"}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotificationError::Rejected {
                status: Some(400),
                retryable: false,
                ..
            }
        ));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn http_throttling_and_server_errors_are_transient() {
        for (status, code) in [("429 Too Many Requests", 429), ("503 Service Unavailable", 503)] {
            let err = send_to(status, "{}").await.unwrap_err();
            match err {
                NotificationError::Rejected {
                    status: Some(got),
                    retryable,
                    ..
                } => {
                    assert_eq!(got, code);
                    assert!(retryable, "{status}");
                }
                other => panic!("unexpected error for {status}: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn http_success_false_is_rejected() {
        let err = send_to(
            "200 OK",
            r#"{"success":false,"error":"Failed to send SMS notification"}"#,
        )
        .await
        .unwrap_err();
        match err {
            NotificationError::Rejected {
                status, message, ..
            } => {
                assert_eq!(status, Some(200));
                assert_eq!(message, "Failed to send SMS notification");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn deliver_stops_after_one_permanent_http_rejection() {
        let (url, hits) = endpoint("404 Not Found", "").await;
        let gateway = HttpSmsGateway::new(url, Duration::from_secs(5)).unwrap();
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            attempt_timeout: Duration::from_secs(5),
        };

        let err = deliver(&gateway, &notification(), &policy).await.unwrap_err();
        assert!(matches!(
            err,
            NotificationError::DeliveryFailed { attempts: 1, .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deliver_retries_http_server_errors() {
        let (url, hits) = endpoint("503 Service Unavailable", "").await;
        let gateway = HttpSmsGateway::new(url, Duration::from_secs(5)).unwrap();
        let policy = RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(1),
            attempt_timeout: Duration::from_secs(5),
        };

        let err = deliver(&gateway, &notification(), &policy).await.unwrap_err();
        assert!(matches!(
            err,
            NotificationError::DeliveryFailed { attempts: 2, .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn logging_gateway_counts_recipients() {
        let gateway = LoggingGateway::new(Duration::ZERO);
        let receipt = gateway
            .send(&SmsNotification {
                phone_numbers: vec!["+1234567890".to_string(), "+1987654321".to_string()],
                message: "HIGH PRIORITY EMERGENCY".to_string(),
                priority: Priority::High,
            })
            .await
            .unwrap();
        assert_eq!(receipt.message, "SMS notification sent to 2 recipients");
    }

    #[test]
    fn http_gateway_keeps_endpoint() {
        let gateway = HttpSmsGateway::new(
            "http://127.0.0.1:8080/api/notifications/send-sms".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(gateway.name(), "http");
        assert!(gateway.endpoint().ends_with("/send-sms"));
    }
}
