//! HTTP fetch of service-controller stats.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ControllerError, ScrapeError};
use crate::stats::ControllerStats;

/// A source of controller stats for one scrape cycle.
///
/// The production implementation is [`ControllerClient`]; tests substitute
/// an in-memory stub so no network is involved.
pub trait StatsSource {
    fn fetch_stats(&self) -> impl Future<Output = Result<ControllerStats, ScrapeError>> + Send;
}

/// HTTP client for the service-controller stats endpoint.
pub struct ControllerClient {
    http: reqwest::Client,
    url: reqwest::Url,
}

impl ControllerClient {
    /// Build a client for `url` with a per-request timeout.
    pub fn new(url: reqwest::Url, timeout: Duration) -> Result<Self, ControllerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// Fetch the raw JSON stats document.
    ///
    /// Transport failures, timeouts, non-2xx statuses, and non-JSON bodies
    /// all surface as [`ControllerError::Http`]. The caller does not retry;
    /// a failed fetch fails the whole scrape cycle.
    pub async fn fetch_json(&self) -> Result<Value, ControllerError> {
        debug!(url = %self.url, "fetching stats from service controller");
        let response = self.http.get(self.url.clone()).send().await?;
        let value = response.error_for_status()?.json().await?;
        Ok(value)
    }
}

impl StatsSource for ControllerClient {
    async fn fetch_stats(&self) -> Result<ControllerStats, ScrapeError> {
        let payload = self.fetch_json().await.map_err(ScrapeError::from)?;
        let stats = ControllerStats::from_value(payload)
            .map_err(|e| ScrapeError::ControllerUnavailable(ControllerError::Decode(e)))?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, route: &str) -> ControllerClient {
        let url = format!("{}{}", server.uri(), route).parse().unwrap();
        ControllerClient::new(url, Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_json_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DATA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "value"})))
            .mount(&server)
            .await;

        let client = client_for(&server, "/DATA").await;
        assert_eq!(client.fetch_json().await.unwrap(), json!({"key": "value"}));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DATA"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, "/DATA").await;
        assert!(matches!(
            client.fetch_json().await,
            Err(ControllerError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DATA"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, "/DATA").await;
        assert!(matches!(
            client.fetch_json().await,
            Err(ControllerError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_stats_decodes_typed_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DATA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "services": [{"address": "backend", "protocol": "http"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "/DATA").await;
        let stats = client.fetch_stats().await.unwrap();
        assert!(stats.sites.is_empty());
        assert_eq!(stats.services.len(), 1);
        assert_eq!(stats.services[0].address, "backend");
    }

    #[tokio::test]
    async fn test_fetch_stats_rejects_misshapen_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DATA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sites": "nope"})))
            .mount(&server)
            .await;

        let client = client_for(&server, "/DATA").await;
        assert!(matches!(
            client.fetch_stats().await,
            Err(ScrapeError::ControllerUnavailable(ControllerError::Decode(_)))
        ));
    }
}
