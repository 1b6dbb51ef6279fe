//! Error types for a single monitoring cycle.

use thiserror::Error;

/// Errors that can interrupt one monitoring cycle.
///
/// None of these are fatal: the loop reports them and moves on to the next
/// cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// Transport failure or timeout talking to the sensor or push service.
    #[error("Network error: {0}")]
    Network(String),

    /// The sensor answered with something other than 200.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The body was not the JSON we expected.
    #[error("Parse error: {0}")]
    PayloadParse(String),

    /// A configuration value could not be parsed (threshold, port).
    #[error("Invalid {field}: {value:?}")]
    ConfigValue {
        field: &'static str,
        value: String,
    },
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MonitorError::Network("request timed out".to_string())
        } else if err.is_decode() {
            MonitorError::PayloadParse(err.to_string())
        } else if let Some(status) = err.status() {
            MonitorError::HttpStatus(status.as_u16())
        } else {
            MonitorError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_log_format() {
        assert_eq!(MonitorError::HttpStatus(503).to_string(), "HTTP 503");
        assert_eq!(
            MonitorError::ConfigValue {
                field: "acceleration threshold",
                value: "abc".to_string()
            }
            .to_string(),
            "Invalid acceleration threshold: \"abc\""
        );
        assert!(MonitorError::Network("refused".to_string())
            .to_string()
            .contains("refused"));
    }
}
