// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # gravitrack
//!
//! A terminal monitor for a phone running phyphox with remote access enabled.
//!
//! The monitor polls the phyphox `/get` endpoint, reduces the latest
//! accelerometer and gyroscope values to magnitudes, and sends a Pushover
//! emergency alert when either magnitude goes over its limit. Alerts are
//! rate limited by a cooldown so a sustained violation does not flood the
//! receiving device.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │◀───│ monitor  │───▶│ notify  │───▶│Pushover │ │
//! │  │ (state) │    │  (loop)  │    │         │    │         │ │
//! │  └────┬────┘    └────┬─────┘    └─────────┘    └─────────┘ │
//! │       │              │                                      │
//! │       ▼              ▼                                      │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐                │
//! │  │   ui    │    │  source  │───▶│  data   │                │
//! │  │(render) │    │  (http)  │    │(parsing)│                │
//! │  └─────────┘    └──────────┘    └─────────┘                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Sensor abstraction ([`SensorSource`] trait) and the phyphox HTTP client
//! - **[`data`]**: Pure processing - channel parsing, magnitudes, limits and cooldown
//! - **[`notify`]**: Push delivery ([`Notifier`] trait) and the Pushover implementation
//! - **[`monitor`]**: The polling task and its control handle
//! - **[`settings`]**: Layered configuration (defaults, TOML file, environment, CLI)
//! - **[`app`]** / **[`ui`]**: Display state and ratatui rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive TUI against a phone on the local network
//! gravitrack --host 192.168.1.20 --user-key u123 --api-token a456
//!
//! # Plain output, monitoring starts immediately
//! gravitrack --config gravitrack.toml --headless
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use gravitrack::{HttpSource, LoopTiming, MonitorLoop, MonitorSettings, PushoverNotifier};
//!
//! # tokio_test::block_on(async {
//! let source = Arc::new(HttpSource::new().unwrap());
//! let notifier = Arc::new(PushoverNotifier::builder().build().unwrap());
//!
//! let (handle, mut events) =
//!     MonitorLoop::spawn(source, notifier, MonitorSettings::default(), LoopTiming::default());
//! handle.start();
//!
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.log_line());
//! }
//! # });
//! ```
//!
//! ### Evaluating a payload by hand
//!
//! ```
//! use gravitrack::data::parse_reading;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "buffer": {
//!         "accX": { "buffer": [0.0, 3.0] },
//!         "accY": { "buffer": [4.0] },
//!         "accZ": { "buffer": [0.0] }
//!     }
//! });
//! let reading = parse_reading(&payload);
//! assert_eq!(reading.acceleration.magnitude(), 5.0);
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod monitor;
pub mod notify;
pub mod settings;
pub mod source;
pub mod ui;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    evaluate, magnitude, parse_reading, AxisSample, Evaluation, NotificationState,
    ThresholdConfig, Violation,
};
pub use error::MonitorError;
pub use monitor::{
    LogLevel, LogLine, LoopTiming, MonitorEvent, MonitorHandle, MonitorLoop, MonitorState,
    Reading,
};
pub use notify::{DispatchOutcome, Notifier, PushCredentials, PushoverNotifier};
pub use settings::{MonitorSettings, SettingsLoader, SettingsOverrides};
pub use source::{HttpSource, SensorEndpoint, SensorSource};
