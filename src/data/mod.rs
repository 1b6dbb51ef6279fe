//! Pure data processing for sensor readings.
//!
//! This module turns raw phyphox payloads into magnitudes and decides when
//! an alert is due. Nothing in here does I/O.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of interval strings (e.g., "500ms", "10s")
//! - [`parser`]: Channel-name matching and extraction of [`AxisSample`]s
//! - [`sample`]: [`AxisSample`] and the magnitude calculation
//! - [`threshold`]: Limits, cooldown state and [`evaluate`]
//!
//! ## Data Flow
//!
//! ```text
//! serde_json::Value (raw /get body)
//!        │
//!        ▼
//! parse_reading()  ──▶ ParsedReading { acceleration, angular_velocity, errors }
//!        │
//!        ▼
//! AxisSample::magnitude()
//!        │
//!        ▼
//! evaluate() with ThresholdConfig + NotificationState ──▶ Evaluation
//! ```

pub mod duration;
pub mod parser;
pub mod sample;
pub mod threshold;

pub use parser::{parse_reading, ChannelError, ParsedReading};
pub use sample::{magnitude, Axis, AxisSample};
pub use threshold::{
    evaluate, Evaluation, NotificationState, ThresholdConfig, Violation, DEFAULT_COOLDOWN,
};
