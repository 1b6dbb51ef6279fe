//! Pushover notifier using the Messages API.
//!
//! Alerts go out as emergency-priority messages: Pushover repeats them
//! every `retry` seconds until acknowledged or `expire` seconds pass.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gravitrack::{Notifier, PushCredentials, PushoverNotifier};
//!
//! # tokio_test::block_on(async {
//! let notifier = PushoverNotifier::builder().build().unwrap();
//! let credentials = PushCredentials {
//!     user_key: "u123".to_string(),
//!     api_token: "a456".to_string(),
//! };
//! let outcome = notifier
//!     .notify(&credentials, &["Acceleration: 61.20 m/s²".to_string()])
//!     .await;
//! println!("{}", outcome);
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use super::{DispatchOutcome, Notifier, PushCredentials};
use crate::error::MonitorError;

/// Pushover Messages API endpoint.
pub const PUSHOVER_MESSAGES_URL: &str = "https://api.pushover.net/1/messages.json";

const ALERT_TITLE: &str = "[GraviTrack] Sensor Alert";
/// Emergency priority: requires acknowledgement.
const PRIORITY: &str = "2";
const RETRY_SECS: &str = "30";
const EXPIRE_SECS: &str = "3600";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Notifier that posts to the Pushover Messages API.
#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    client: Client,
    endpoint: String,
}

impl PushoverNotifier {
    /// Create a new builder for configuring the notifier.
    pub fn builder() -> PushoverNotifierBuilder {
        PushoverNotifierBuilder::default()
    }

    /// Returns the URL notifications are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Form fields for one message.
fn form_fields(credentials: &PushCredentials, alerts: &[String]) -> Vec<(&'static str, String)> {
    vec![
        ("token", credentials.api_token.clone()),
        ("user", credentials.user_key.clone()),
        ("title", ALERT_TITLE.to_string()),
        ("message", alerts.join("\n")),
        ("priority", PRIORITY.to_string()),
        ("retry", RETRY_SECS.to_string()),
        ("expire", EXPIRE_SECS.to_string()),
    ]
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, credentials: &PushCredentials, alerts: &[String]) -> DispatchOutcome {
        let result = self
            .client
            .post(&self.endpoint)
            .form(&form_fields(credentials, alerts))
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(alerts = alerts.len(), "notification sent");
                DispatchOutcome::Sent
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(status, "notification rejected");
                DispatchOutcome::Failed(status)
            }
            Err(e) => {
                let err = MonitorError::from(e);
                warn!(error = %err, "notification request failed");
                DispatchOutcome::Errored(err.to_string())
            }
        }
    }
}

/// Builder for PushoverNotifier.
#[derive(Debug, Default)]
pub struct PushoverNotifierBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl PushoverNotifierBuilder {
    /// Set the Messages API URL (default: the public Pushover endpoint).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client. Overrides `timeout`.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the notifier.
    pub fn build(self) -> Result<PushoverNotifier, MonitorError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(|e| {
                    MonitorError::Network(format!("failed to build HTTP client: {}", e))
                })?,
        };

        Ok(PushoverNotifier {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| PUSHOVER_MESSAGES_URL.to_string()),
        })
    }
}
