//! Client for the Ex Libris analytics reports API.

use async_trait::async_trait;
use reqwest::Url;
use shared::{Error, Result};
use std::time::Duration;
use tracing::{error, info};

/// Source of raw report documents.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch one report page for an already encoded query string.
    async fn fetch(&self, query: &str) -> Result<String>;
}

/// HTTP client for the analytics reports endpoint.
pub struct AnalyticsClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AnalyticsClient {
    /// Create a client for `endpoint` whose requests give up after `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("Invalid analytics endpoint {}: {}", endpoint, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, endpoint })
    }

    fn report_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(query));
        url
    }
}

#[async_trait]
impl ReportSource for AnalyticsClient {
    async fn fetch(&self, query: &str) -> Result<String> {
        let url = self.report_url(query);
        info!("Requesting analytics report from {}", self.endpoint);

        // Error text must not echo the URL: the query carries the API key.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                let e = e.without_url();
                error!("Analytics API call failed: {}", e);
                Error::RemoteCall(e.to_string())
            })?;

        info!("Analytics API responded with {}", response.status());

        response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read analytics response body: {}", e);
            Error::RemoteCall(e.to_string())
        })
    }
}
