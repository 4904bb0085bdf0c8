//! Background lead discovery handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use leadflow_core::JobId;

use super::parse_payload;
use crate::dispatcher::{HandlerError, JobHandler};
use crate::downstream::{DiscoveryRequest, DownstreamClient};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveryPayload {
    tenant_id: String,
    #[serde(default)]
    source: Option<String>,
}

/// `discovery.background` — one downstream discovery run; failure propagates.
pub struct DiscoveryBackground {
    client: Arc<dyn DownstreamClient>,
}

impl DiscoveryBackground {
    pub fn new(client: Arc<dyn DownstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobHandler for DiscoveryBackground {
    async fn execute(&self, payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        let discovery: DiscoveryPayload = parse_payload(payload)?;
        let request = DiscoveryRequest {
            tenant_id: discovery.tenant_id,
            source: discovery.source,
        };
        let result = self.client.discover(&request).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downstream::testing::StubDownstream;
    use serde_json::json;

    #[tokio::test]
    async fn discovery_passes_source_and_tenant() {
        let stub = Arc::new(StubDownstream::default());
        let handler = DiscoveryBackground::new(stub.clone());

        let result = handler
            .execute(
                &json!({"tenantId": "T1", "source": "linkedin"}),
                JobId::new(),
            )
            .await
            .unwrap();
        assert_eq!(result["discovered"], 12);

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls[0].0, "discovery");
        assert_eq!(calls[0].1["tenantId"], "T1");
        assert_eq!(calls[0].1["source"], "linkedin");
    }

    #[tokio::test]
    async fn failure_propagates() {
        let handler = DiscoveryBackground::new(Arc::new(StubDownstream::failing_all()));
        let err = handler
            .execute(&json!({"tenantId": "T1"}), JobId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Downstream(_)));
    }
}
