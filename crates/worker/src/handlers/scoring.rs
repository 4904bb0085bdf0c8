//! Lead scoring handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use leadflow_core::JobId;

use super::{parse_payload, to_result, BatchItem, BatchPayload, BatchSummary};
use crate::dispatcher::{HandlerError, JobHandler};
use crate::downstream::{DownstreamClient, ScoreRequest};

/// `scoring.batch` — one downstream `score` call per lead id, with the same
/// per-item failure isolation as enrichment batches.
///
/// The downstream response body is opaque apart from the `score` field,
/// which is lifted into the item result.
pub struct ScoringBatch {
    client: Arc<dyn DownstreamClient>,
}

impl ScoringBatch {
    pub fn new(client: Arc<dyn DownstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobHandler for ScoringBatch {
    async fn execute(&self, payload: &Value, job_id: JobId) -> Result<Value, HandlerError> {
        let batch: BatchPayload = parse_payload(payload)?;

        let mut results = Vec::with_capacity(batch.lead_ids.len());
        for lead_id in &batch.lead_ids {
            let request = ScoreRequest {
                lead_id: lead_id.clone(),
                tenant_id: batch.tenant_id.clone(),
            };
            match self.client.score(&request).await {
                Ok(body) => {
                    let score = body.get("score").cloned().unwrap_or(Value::Null);
                    results.push(BatchItem::succeeded(
                        lead_id.clone(),
                        "scored",
                        json!({"score": score}),
                    ));
                }
                Err(err) => {
                    warn!(job_id = %job_id, lead_id = %lead_id, error = %err, "scoring item failed");
                    results.push(BatchItem::failed(lead_id.clone(), err.to_string()));
                }
            }
        }

        to_result(&BatchSummary::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downstream::testing::StubDownstream;

    #[tokio::test]
    async fn scores_are_read_from_the_response() {
        let handler = ScoringBatch::new(Arc::new(StubDownstream::default()));
        let result = handler
            .execute(
                &json!({"leadIds": ["L1", "L2"], "tenantId": "T1"}),
                JobId::new(),
            )
            .await
            .unwrap();

        assert_eq!(result["processed"], 2);
        for item in result["results"].as_array().unwrap() {
            assert_eq!(item["status"], "scored");
            assert_eq!(item["data"]["score"], 87);
        }
    }

    #[tokio::test]
    async fn per_item_failure_never_aborts_the_batch() {
        let handler = ScoringBatch::new(Arc::new(StubDownstream::failing_leads(["L1"])));
        let result = handler
            .execute(
                &json!({"leadIds": ["L1", "L2"], "tenantId": "T1"}),
                JobId::new(),
            )
            .await
            .unwrap();

        assert_eq!(result["processed"], 2);
        let results = result["results"].as_array().unwrap();
        assert_eq!(results[0]["status"], "failed");
        assert_eq!(results[0]["error"], "downstream score returned 502");
        assert_eq!(results[1]["status"], "scored");
    }
}
