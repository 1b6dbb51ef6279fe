//! Messages posted from the polling task to the presentation side.

use std::fmt;

use chrono::{DateTime, Local};

/// Severity of a log line. Drives its colour in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One timestamped line of the monitor log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Magnitudes computed in one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Acceleration magnitude in m/s².
    pub acceleration: f64,
    /// Angular velocity magnitude in rad/s.
    pub angular_velocity: f64,
    pub at: DateTime<Local>,
}

impl Reading {
    pub fn new(acceleration: f64, angular_velocity: f64) -> Self {
        Self {
            acceleration,
            angular_velocity,
            at: Local::now(),
        }
    }
}

/// What the monitor loop hands to the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Fresh magnitudes; replaces whatever is displayed.
    Reading(Reading),
    /// A line for the log (errors, notifications, start/stop).
    Log(LogLine),
}

impl MonitorEvent {
    /// The log line this event contributes.
    pub fn log_line(&self) -> LogLine {
        match self {
            MonitorEvent::Reading(reading) => LogLine {
                at: reading.at,
                level: LogLevel::Info,
                message: format!(
                    "Acc: {:.2} | Gyr: {:.2}",
                    reading.acceleration, reading.angular_velocity
                ),
            },
            MonitorEvent::Log(line) => line.clone(),
        }
    }
}
