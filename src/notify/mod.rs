//! Push notification dispatch.
//!
//! A [`Notifier`] sends one combined alert per call and reports how it went
//! as a [`DispatchOutcome`]. It never returns an error: a failed
//! notification is something to log, not a reason to stop monitoring.

mod pushover;

pub use pushover::{PushoverNotifier, PushoverNotifierBuilder, PUSHOVER_MESSAGES_URL};

use std::fmt;
use std::fmt::Debug;

use async_trait::async_trait;

/// Static credentials passed with every notification.
#[derive(Clone, PartialEq, Eq)]
pub struct PushCredentials {
    pub user_key: String,
    pub api_token: String,
}

// Keep tokens out of logs.
impl Debug for PushCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentials")
            .field("user_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The service accepted the notification (HTTP 200).
    Sent,
    /// The service answered with another status.
    Failed(u16),
    /// The request never completed (transport error, timeout).
    Errored(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Sent => write!(f, "Notification sent!"),
            DispatchOutcome::Failed(status) => write!(f, "Notification failed (HTTP {})", status),
            DispatchOutcome::Errored(reason) => write!(f, "Notification error: {}", reason),
        }
    }
}

/// Trait for sending an alert to a push service.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Send `alerts` as a single newline-joined message.
    async fn notify(&self, credentials: &PushCredentials, alerts: &[String]) -> DispatchOutcome;
}
