//! Scheduled pipeline handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use leadflow_core::JobId;

use super::parse_payload;
use crate::dispatcher::{HandlerError, JobHandler};
use crate::downstream::{DownstreamClient, PipelineRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelinePayload {
    pipeline: String,
    tenant_id: String,
}

/// `pipeline.scheduled` — run a named downstream pipeline. One unit of work,
/// so whole-call failure propagates.
pub struct PipelineScheduled {
    client: Arc<dyn DownstreamClient>,
}

impl PipelineScheduled {
    pub fn new(client: Arc<dyn DownstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobHandler for PipelineScheduled {
    async fn execute(&self, payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        let run: PipelinePayload = parse_payload(payload)?;
        let request = PipelineRequest {
            pipeline: run.pipeline,
            tenant_id: run.tenant_id,
        };
        let result = self.client.run_pipeline(&request).await?;
        Ok(result)
    }
}
