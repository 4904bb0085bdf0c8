//! Client for the downstream service that performs the actual work.
//!
//! The worker treats the downstream service as an opaque network dependency:
//! each operation takes a small JSON body and returns a JSON body whose shape
//! the worker does not interpret (except where a handler reads a specific
//! field, e.g. `score`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Default per-request timeout. Stalled downstream calls would otherwise
/// block a job indefinitely.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Downstream call failure.
#[derive(Debug, thiserror::Error)]
pub enum DownstreamError {
    #[error("downstream {op} request failed: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("downstream {op} returned {status}")]
    Status { op: &'static str, status: u16 },
}

/// Body for `enrich` calls (one lead).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichRequest {
    pub lead_id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Body for `score` calls (one lead).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub lead_id: String,
    pub tenant_id: String,
}

/// Body for `pipeline` runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequest {
    pub pipeline: String,
    pub tenant_id: String,
}

/// Body for `discovery` runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Outbound calls to the downstream service, one method per named operation.
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    async fn enrich(&self, request: &EnrichRequest) -> Result<Value, DownstreamError>;
    async fn score(&self, request: &ScoreRequest) -> Result<Value, DownstreamError>;
    async fn run_pipeline(&self, request: &PipelineRequest) -> Result<Value, DownstreamError>;
    async fn discover(&self, request: &DiscoveryRequest) -> Result<Value, DownstreamError>;
}

/// Downstream endpoint configuration.
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl DownstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the environment (`DOWNSTREAM_URL`,
    /// `DOWNSTREAM_TIMEOUT_MS`), falling back to a local dev default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("DOWNSTREAM_URL").unwrap_or_else(|_| {
            tracing::warn!("DOWNSTREAM_URL not set; using local dev default");
            "http://127.0.0.1:9090".to_string()
        });
        let timeout = std::env::var("DOWNSTREAM_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));

        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout }
    }
}

/// HTTP implementation of [`DownstreamClient`].
///
/// Posts JSON to `{base_url}/{operation}` with a bounded timeout; non-2xx
/// responses are surfaced as [`DownstreamError::Status`].
#[derive(Debug)]
pub struct HttpDownstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDownstreamClient {
    pub fn new(config: DownstreamConfig) -> Result<Self, DownstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| DownstreamError::Transport { op: "client", source })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(
        &self,
        op: &'static str,
        body: &impl Serialize,
    ) -> Result<Value, DownstreamError> {
        let url = format!("{}/{}", self.base_url, op);
        debug!(%url, op, "downstream call");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| DownstreamError::Transport { op, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownstreamError::Status { op, status: status.as_u16() });
        }

        response
            .json()
            .await
            .map_err(|source| DownstreamError::Transport { op, source })
    }
}

#[async_trait]
impl DownstreamClient for HttpDownstreamClient {
    async fn enrich(&self, request: &EnrichRequest) -> Result<Value, DownstreamError> {
        self.post("enrich", request).await
    }

    async fn score(&self, request: &ScoreRequest) -> Result<Value, DownstreamError> {
        self.post("score", request).await
    }

    async fn run_pipeline(&self, request: &PipelineRequest) -> Result<Value, DownstreamError> {
        self.post("pipeline", request).await
    }

    async fn discover(&self, request: &DiscoveryRequest) -> Result<Value, DownstreamError> {
        self.post("discovery", request).await
    }
}
