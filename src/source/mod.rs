//! Sensor source abstraction for fetching raw phyphox payloads.
//!
//! The monitor loop only sees the [`SensorSource`] trait, so the HTTP
//! client can be swapped for a scripted source in tests.

mod http;

pub use http::{HttpSource, DEFAULT_FETCH_TIMEOUT};

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::MonitorError;

/// Address of a phyphox remote-access server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorEndpoint {
    pub host: String,
    pub port: u16,
}

impl SensorEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `/get` URL that returns the latest buffer values.
    pub fn url(&self) -> String {
        format!("http://{}:{}/get", self.host, self.port)
    }
}

/// Trait for fetching one raw sensor payload.
///
/// # Example
///
/// ```no_run
/// use gravitrack::{HttpSource, SensorEndpoint, SensorSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::new().unwrap();
/// let payload = source.fetch(&SensorEndpoint::new("192.168.1.20", 8080)).await;
/// # });
/// ```
#[async_trait]
pub trait SensorSource: Send + Sync + Debug {
    /// Fetch the current payload from `endpoint`.
    ///
    /// Anything other than a 200 response with a JSON body is an error.
    async fn fetch(&self, endpoint: &SensorEndpoint) -> Result<Value, MonitorError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
