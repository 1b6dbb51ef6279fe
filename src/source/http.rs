//! HTTP sensor source for the phyphox remote-access API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{SensorEndpoint, SensorSource};
use crate::error::MonitorError;

/// Default bound on a single `/get` request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// A sensor source that polls `http://{host}:{port}/get`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    description: String,
}

impl HttpSource {
    /// Create a source with the default 2 second timeout.
    pub fn new() -> Result<Self, MonitorError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a source whose requests give up after `timeout`.
    ///
    /// The phone running phyphox is on the local network, so system proxies
    /// are bypassed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| MonitorError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            description: "phyphox http".to_string(),
        })
    }
}

#[async_trait]
impl SensorSource for HttpSource {
    async fn fetch(&self, endpoint: &SensorEndpoint) -> Result<Value, MonitorError> {
        let url = endpoint.url();
        debug!(%url, "fetching sensor payload");

        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(MonitorError::HttpStatus(response.status().as_u16()));
        }

        let payload: Value = response.json().await?;
        Ok(payload)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, serve_silent, CannedResponse};

    #[tokio::test]
    async fn test_fetch_parses_json_body() {
        let server = serve_once(CannedResponse::json(
            200,
            r#"{"buffer":{"accX":{"buffer":[1.5]}}}"#,
        ))
        .await;

        let source = HttpSource::new().unwrap();
        let payload = source.fetch(&server.endpoint()).await.unwrap();
        assert_eq!(payload["buffer"]["accX"]["buffer"][0], 1.5);

        let request = server.request().await;
        assert!(request.starts_with("GET /get "));
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_http_status_error() {
        let server = serve_once(CannedResponse::json(503, "{}")).await;

        let source = HttpSource::new().unwrap();
        let err = source.fetch(&server.endpoint()).await.unwrap_err();
        assert_eq!(err, MonitorError::HttpStatus(503));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_parse_error() {
        let server = serve_once(CannedResponse::json(200, "not json")).await;

        let source = HttpSource::new().unwrap();
        let err = source.fetch(&server.endpoint()).await.unwrap_err();
        assert!(matches!(err, MonitorError::PayloadParse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = HttpSource::new().unwrap();
        let err = source
            .fetch(&SensorEndpoint::new("127.0.0.1", port))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_network_error() {
        let addr = serve_silent().await;

        let source = HttpSource::with_timeout(Duration::from_millis(50)).unwrap();
        let err = source
            .fetch(&SensorEndpoint::new("127.0.0.1", addr.port()))
            .await
            .unwrap_err();
        assert_eq!(err, MonitorError::Network("request timed out".to_string()));
    }

    #[test]
    fn test_endpoint_url() {
        let endpoint = SensorEndpoint::new("172.16.1.91", 8080);
        assert_eq!(endpoint.url(), "http://172.16.1.91:8080/get");
    }
}
