//! Extraction of axis samples from a phyphox `/get` payload.
//!
//! phyphox names its buffers freely (`accX`, `gyrZ`, `acc_time`, ...), so
//! channels are classified by case-insensitive substring matching. All of
//! that guesswork lives here.
//!
//! ```text
//! { "buffer": { "accX": { "buffer": [0.1, 0.2] }, "gyrZ": { "buffer": [] } } }
//!                  │                          │
//!                  └── acceleration.x = 0.2 ──┘   (empty: nothing is set)
//! ```

use serde_json::Value;
use thiserror::Error;

use super::sample::{Axis, AxisSample};

/// A channel whose latest value was not a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error: channel '{channel}' has non-numeric value {value}")]
pub struct ChannelError {
    pub channel: String,
    pub value: String,
}

/// Result of parsing one payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReading {
    pub acceleration: AxisSample,
    pub angular_velocity: AxisSample,
    /// Channels that were skipped because their value was not numeric.
    pub errors: Vec<ChannelError>,
}

/// Which quantities a channel name feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelTarget {
    acceleration: bool,
    angular_velocity: bool,
    axis: Axis,
}

/// Parse a payload into acceleration and angular-velocity samples.
///
/// Missing or malformed structure never fails the whole reading: unresolved
/// axes stay at 0.0. Only a non-numeric value fails, and only for its own
/// channel.
pub fn parse_reading(payload: &Value) -> ParsedReading {
    let mut reading = ParsedReading::default();

    let Some(channels) = payload.get("buffer").and_then(Value::as_object) else {
        return reading;
    };

    for (name, info) in channels {
        let Some(last) = latest_value(info) else {
            continue;
        };
        let Some(target) = classify(name) else {
            continue;
        };

        let value = match numeric(last) {
            Some(v) => v,
            None => {
                reading.errors.push(ChannelError {
                    channel: name.clone(),
                    value: last.to_string(),
                });
                continue;
            }
        };

        if target.acceleration {
            reading.acceleration.set(target.axis, value);
        }
        if target.angular_velocity {
            reading.angular_velocity.set(target.axis, value);
        }
    }

    reading
}

/// Last element of a channel's `buffer` array, if any.
fn latest_value(info: &Value) -> Option<&Value> {
    info.get("buffer")?.as_array()?.last()
}

fn classify(name: &str) -> Option<ChannelTarget> {
    let lower = name.to_lowercase();
    let acceleration = lower.contains("acc");
    let angular_velocity = lower.contains("gyr") || lower.contains("gyro");
    if !acceleration && !angular_velocity {
        return None;
    }

    // Fixed check order: the first letter found wins.
    let axis = if lower.contains('x') {
        Axis::X
    } else if lower.contains('y') {
        Axis::Y
    } else if lower.contains('z') {
        Axis::Z
    } else {
        return None;
    };

    Some(ChannelTarget {
        acceleration,
        angular_velocity,
        axis,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
