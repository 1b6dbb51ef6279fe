//! Threshold evaluation and notification cooldown.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::MonitorError;
use crate::settings::ThresholdSettings;

/// Default minimum time between two dispatched notifications.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Limits above which a magnitude counts as a violation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    /// Acceleration limit in m/s².
    pub acceleration_limit: f64,
    /// Angular velocity limit in rad/s.
    pub angular_velocity_limit: f64,
}

impl ThresholdConfig {
    /// Parse the limits from their configured string form.
    pub fn from_settings(settings: &ThresholdSettings) -> Result<Self, MonitorError> {
        Ok(Self {
            acceleration_limit: parse_limit("acceleration threshold", &settings.acceleration)?,
            angular_velocity_limit: parse_limit(
                "angular velocity threshold",
                &settings.angular_velocity,
            )?,
        })
    }
}

fn parse_limit(field: &'static str, value: &str) -> Result<f64, MonitorError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MonitorError::ConfigValue {
            field,
            value: value.to_string(),
        })
}

/// When the last notification was attempted.
///
/// `record_attempt` is the only writer; the value never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationState {
    last_sent_at: Option<Instant>,
}

impl NotificationState {
    pub fn last_sent_at(&self) -> Option<Instant> {
        self.last_sent_at
    }

    /// Record a dispatch attempt at `at`.
    pub fn record_attempt(&mut self, at: Instant) {
        self.last_sent_at = Some(match self.last_sent_at {
            Some(previous) => previous.max(at),
            None => at,
        });
    }

    /// Whether strictly more than `cooldown` has passed since the last attempt.
    pub fn cooldown_elapsed(&self, now: Instant, cooldown: Duration) -> bool {
        match self.last_sent_at {
            Some(last) => now.saturating_duration_since(last) > cooldown,
            None => true,
        }
    }
}

/// A metric whose magnitude exceeded its limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    Acceleration(f64),
    AngularVelocity(f64),
}

impl Violation {
    /// Human-readable alert line, two decimals.
    pub fn alert(&self) -> String {
        match self {
            Violation::Acceleration(m) => format!("Acceleration: {:.2} m/s²", m),
            Violation::AngularVelocity(m) => format!("Gyroscope: {:.2} rad/s", m),
        }
    }
}

/// Outcome of comparing one cycle's magnitudes against the limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub violations: Vec<Violation>,
    pub should_notify: bool,
}

impl Evaluation {
    /// Alert lines for the notification, empty unless one is due.
    pub fn alerts(&self) -> Vec<String> {
        if !self.should_notify {
            return Vec::new();
        }
        self.violations.iter().map(Violation::alert).collect()
    }
}

/// Compare magnitudes against `limits` and decide whether a notification is due.
pub fn evaluate(
    acceleration: f64,
    angular_velocity: f64,
    limits: &ThresholdConfig,
    state: &NotificationState,
    now: Instant,
    cooldown: Duration,
) -> Evaluation {
    let mut violations = Vec::new();
    if acceleration > limits.acceleration_limit {
        violations.push(Violation::Acceleration(acceleration));
    }
    if angular_velocity > limits.angular_velocity_limit {
        violations.push(Violation::AngularVelocity(angular_velocity));
    }

    let should_notify = !violations.is_empty() && state.cooldown_elapsed(now, cooldown);

    Evaluation {
        violations,
        should_notify,
    }
}
