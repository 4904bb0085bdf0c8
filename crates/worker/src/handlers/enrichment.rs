//! Lead enrichment handlers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use leadflow_core::JobId;

use super::{parse_payload, to_result, BatchItem, BatchPayload, BatchSummary};
use crate::dispatcher::{HandlerError, JobHandler};
use crate::downstream::{DownstreamClient, EnrichRequest};

/// `enrichment.batch` — one downstream `enrich` call per lead id.
///
/// Failed items are recorded individually; the batch never aborts.
pub struct EnrichmentBatch {
    client: Arc<dyn DownstreamClient>,
}

impl EnrichmentBatch {
    pub fn new(client: Arc<dyn DownstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobHandler for EnrichmentBatch {
    async fn execute(&self, payload: &Value, job_id: JobId) -> Result<Value, HandlerError> {
        let batch: BatchPayload = parse_payload(payload)?;

        let mut results = Vec::with_capacity(batch.lead_ids.len());
        for lead_id in &batch.lead_ids {
            let request = EnrichRequest {
                lead_id: lead_id.clone(),
                tenant_id: batch.tenant_id.clone(),
                source: None,
            };
            match self.client.enrich(&request).await {
                Ok(data) => results.push(BatchItem::succeeded(lead_id.clone(), "enriched", data)),
                Err(err) => {
                    warn!(job_id = %job_id, lead_id = %lead_id, error = %err, "enrichment item failed");
                    results.push(BatchItem::failed(lead_id.clone(), err.to_string()));
                }
            }
        }

        to_result(&BatchSummary::new(results))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleLeadPayload {
    lead_id: String,
    tenant_id: String,
    #[serde(default)]
    source: Option<String>,
}

/// `enrichment.single` — one downstream call for one lead; whole-call failure
/// propagates.
pub struct EnrichmentSingle {
    client: Arc<dyn DownstreamClient>,
}

impl EnrichmentSingle {
    pub fn new(client: Arc<dyn DownstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobHandler for EnrichmentSingle {
    async fn execute(&self, payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        let lead: SingleLeadPayload = parse_payload(payload)?;
        let request = EnrichRequest {
            lead_id: lead.lead_id,
            tenant_id: lead.tenant_id,
            source: lead.source,
        };
        let data = self.client.enrich(&request).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downstream::testing::StubDownstream;
    use serde_json::json;

    #[tokio::test]
    async fn batch_processes_every_item_even_when_all_fail() {
        let stub = Arc::new(StubDownstream::failing_all());
        let handler = EnrichmentBatch::new(stub);

        let result = handler
            .execute(
                &json!({"leadIds": ["L1", "L2", "L3"], "tenantId": "T1"}),
                JobId::new(),
            )
            .await
            .unwrap();

        assert_eq!(result["processed"], 3);
        for item in result["results"].as_array().unwrap() {
            assert_eq!(item["status"], "failed");
            assert!(item["error"].is_string());
        }
    }

    #[tokio::test]
    async fn batch_attributes_results_to_the_right_lead() {
        let stub = Arc::new(StubDownstream::failing_leads(["L2"]));
        let handler = EnrichmentBatch::new(stub.clone());

        let result = handler
            .execute(
                &json!({"leadIds": ["L1", "L2"], "tenantId": "T1"}),
                JobId::new(),
            )
            .await
            .unwrap();

        let results = result["results"].as_array().unwrap();
        assert_eq!(results[0]["leadId"], "L1");
        assert_eq!(results[0]["status"], "enriched");
        assert_eq!(results[0]["data"]["leadId"], "L1");
        assert_eq!(results[1]["leadId"], "L2");
        assert_eq!(results[1]["status"], "failed");

        // Both items were attempted, in payload order, with the tenant scope.
        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1["leadId"], "L1");
        assert_eq!(calls[1].1["leadId"], "L2");
        assert_eq!(calls[0].1["tenantId"], "T1");
    }

    #[tokio::test]
    async fn batch_rejects_malformed_payload() {
        let handler = EnrichmentBatch::new(Arc::new(StubDownstream::default()));
        let err = handler
            .execute(&json!({"tenantId": "T1"}), JobId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Payload(_)));
    }

    #[tokio::test]
    async fn single_returns_downstream_body() {
        let handler = EnrichmentSingle::new(Arc::new(StubDownstream::default()));
        let result = handler
            .execute(&json!({"leadId": "L1", "tenantId": "T1"}), JobId::new())
            .await
            .unwrap();
        assert_eq!(result["leadId"], "L1");
        assert_eq!(result["company"], "Acme Corp");
    }

    #[tokio::test]
    async fn single_propagates_downstream_failure() {
        let handler = EnrichmentSingle::new(Arc::new(StubDownstream::failing_all()));
        let err = handler
            .execute(&json!({"leadId": "L1", "tenantId": "T1"}), JobId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Downstream(_)));
    }
}
