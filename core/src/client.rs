use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::errors::{CompareError, CompareResult};
use crate::types::*;

/// The three backend calls the demo relies on
#[async_trait]
pub trait ComparisonApi: Send + Sync {
    async fn health(&self) -> CompareResult<HealthStatus>;

    /// Sends `query` as-is; validation is the caller's job
    async fn compare(&self, query: &str) -> CompareResult<ComparisonResult>;

    async fn demo_queries(&self) -> CompareResult<Vec<String>>;
}

/// HTTP client for the comparison backend
#[derive(Debug, Clone)]
pub struct ComparisonClient {
    client: Client,
    base_url: String,
}

impl ComparisonClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> CompareResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            CompareError::ConfigError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Reads the body as JSON and classifies its envelope
    async fn read_envelope(response: Response) -> CompareResult<(reqwest::StatusCode, ResponseEnvelope)> {
        let status = response.status();
        let body = response.json::<Value>().await.map_err(|e| {
            CompareError::ParsingError(format!("Response was not JSON (HTTP {}): {}", status, e))
        })?;
        Ok((status, ResponseEnvelope::from_value(body)))
    }
}

#[async_trait]
impl ComparisonApi for ComparisonClient {
    #[instrument(skip(self))]
    async fn health(&self) -> CompareResult<HealthStatus> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        let (status, envelope) = Self::read_envelope(response).await?;

        let health = HealthStatus::from_envelope(&envelope);
        debug!(
            http_status = status.as_u16(),
            standard = envelope.is_standard(),
            ready = health.ready,
            "Health check answered"
        );
        Ok(health)
    }

    #[instrument(skip(self, query))]
    async fn compare(&self, query: &str) -> CompareResult<ComparisonResult> {
        debug!("Sending comparison query ({} chars)", query.len());
        let response = self
            .client
            .post(self.endpoint("compare"))
            .json(&CompareRequest { query })
            .send()
            .await?;

        let (status, envelope) = Self::read_envelope(response).await?;
        let result = envelope.into_payload::<ComparisonResult>(status, "Failed to get comparison");
        if let Err(e) = &result {
            warn!(http_status = status.as_u16(), "Comparison failed: {}", e);
        }
        result
    }

    #[instrument(skip(self))]
    async fn demo_queries(&self) -> CompareResult<Vec<String>> {
        let response = self.client.get(self.endpoint("demo-queries")).send().await?;
        let (status, envelope) = Self::read_envelope(response).await?;

        let fallback = if envelope.is_standard() {
            "Failed to load demo queries".to_string()
        } else {
            format!(
                "Failed to load demo queries: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        };

        let data = envelope.into_payload::<DemoQueriesData>(status, &fallback)?;
        debug!("Loaded {} demo queries", data.queries.len());
        Ok(data.queries)
    }
}
