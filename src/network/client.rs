//! HTTP client for making requests to the document store

use crate::config::OutgoingSettings;
use crate::error::StoreError;
use crate::store::{StoreRequest, StoreResponse};
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper configured from the outgoing settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(
            settings.request_timeout.min(crate::MAX_TIMEOUT as f64),
        )
        .map_err(|e| anyhow::anyhow!("invalid outgoing.request_timeout: {}", e))?;

        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: format!("search-aggregator/{}", crate::VERSION),
        })
    }

    /// Execute a store request
    pub async fn execute(&self, request: StoreRequest) -> Result<StoreResponse, StoreError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a store request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: StoreRequest,
        timeout: Duration,
    ) -> Result<StoreResponse, StoreError> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into StoreResponse
    async fn parse_response(response: Response) -> Result<StoreResponse, StoreError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(StoreResponse { status, text, url })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
        assert!(client.unwrap().user_agent().starts_with("search-aggregator/"));
    }

    #[test]
    fn test_client_without_ssl_verification() {
        let settings = OutgoingSettings {
            verify_ssl: false,
            ..Default::default()
        };
        assert!(HttpClient::with_settings(&settings).is_ok());
    }

    #[test]
    fn test_negative_timeout_is_an_error() {
        let settings = OutgoingSettings {
            request_timeout: -1.0,
            ..Default::default()
        };
        let err = HttpClient::with_settings(&settings).err().unwrap();
        assert!(err.to_string().contains("request_timeout"));
    }
}
