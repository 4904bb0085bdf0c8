//! Built-in job handlers and dispatcher assembly.
//!
//! One handler per job type; the full table is registered at construction by
//! [`build_dispatcher`]. Handlers that fan out over a collection of
//! independent sub-units (the `*.batch` types) isolate each sub-unit's
//! failure so one bad item cannot sink the whole batch; single-unit handlers
//! propagate failure directly.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatcher::{Dispatcher, HandlerError};
use crate::downstream::DownstreamClient;
use crate::history::JobHistory;

pub mod discovery;
pub mod enrichment;
pub mod pipeline;
pub mod scoring;
pub mod summaries;

pub use discovery::DiscoveryBackground;
pub use enrichment::{EnrichmentBatch, EnrichmentSingle};
pub use pipeline::PipelineScheduled;
pub use scoring::ScoringBatch;
pub use summaries::{
    AnalyticsAggregate, CleanupStale, ExportGenerate, OutreachCampaign, SignalsAggregate,
};

/// Build a dispatcher with the full handler table registered.
pub fn build_dispatcher(
    history: Arc<JobHistory>,
    client: Arc<dyn DownstreamClient>,
) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(history);
    dispatcher.register(
        "enrichment.batch",
        Arc::new(EnrichmentBatch::new(client.clone())),
    );
    dispatcher.register(
        "enrichment.single",
        Arc::new(EnrichmentSingle::new(client.clone())),
    );
    dispatcher.register("signals.aggregate", Arc::new(SignalsAggregate));
    dispatcher.register(
        "pipeline.scheduled",
        Arc::new(PipelineScheduled::new(client.clone())),
    );
    dispatcher.register("scoring.batch", Arc::new(ScoringBatch::new(client.clone())));
    dispatcher.register("outreach.campaign", Arc::new(OutreachCampaign));
    dispatcher.register(
        "discovery.background",
        Arc::new(DiscoveryBackground::new(client)),
    );
    dispatcher.register("cleanup.stale", Arc::new(CleanupStale));
    dispatcher.register("export.generate", Arc::new(ExportGenerate));
    dispatcher.register("analytics.aggregate", Arc::new(AnalyticsAggregate));
    dispatcher
}

/// Payload shared by the `*.batch` job types.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchPayload {
    pub lead_ids: Vec<String>,
    pub tenant_id: String,
}

/// Result of a whole batch: `processed` counts every attempted item,
/// including failures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchSummary {
    pub processed: usize,
    pub results: Vec<BatchItem>,
}

impl BatchSummary {
    pub fn new(results: Vec<BatchItem>) -> Self {
        Self { processed: results.len(), results }
    }
}

/// Per-item outcome inside a batch result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchItem {
    pub lead_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn succeeded(lead_id: String, status: &'static str, data: Value) -> Self {
        Self { lead_id, status, data: Some(data), error: None }
    }

    pub fn failed(lead_id: String, error: String) -> Self {
        Self { lead_id, status: "failed", data: None, error: Some(error) }
    }
}

/// Deserialize a handler payload, mapping malformed input to a handler-level
/// payload error.
///
/// An absent payload arrives as JSON null; it is treated as an empty object
/// so payloads whose fields all have defaults still parse.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, HandlerError> {
    let payload = match payload {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(payload).map_err(|e| HandlerError::payload(e.to_string()))
}

/// Serialize a handler result into the opaque JSON the dispatcher records.
pub(crate) fn to_result<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    serde_json::to_value(value).map_err(|e| HandlerError::payload(e.to_string()))
}
