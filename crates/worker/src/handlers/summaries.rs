//! Handlers that synthesize a local summary without a downstream call.
//!
//! These are deterministic, fixed-shape stubs: where the source system
//! generated randomized sample data, the stable shape matters to callers and
//! the values do not. Identifiers that need to be unique derive from the job
//! id.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use leadflow_core::JobId;

use super::parse_payload;
use crate::dispatcher::{HandlerError, JobHandler};

/// `signals.aggregate` — aggregation summary of buying signals.
pub struct SignalsAggregate;

#[async_trait]
impl JobHandler for SignalsAggregate {
    async fn execute(&self, _payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        Ok(json!({
            "status": "aggregated",
            "signals": {"news": 0, "funding": 0, "hiring": 0},
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignPayload {
    #[serde(default)]
    campaign_id: Option<String>,
    #[serde(default)]
    lead_ids: Vec<String>,
}

/// `outreach.campaign` — queued-campaign summary.
pub struct OutreachCampaign;

#[async_trait]
impl JobHandler for OutreachCampaign {
    async fn execute(&self, payload: &Value, job_id: JobId) -> Result<Value, HandlerError> {
        let campaign: CampaignPayload = parse_payload(payload)?;
        let campaign_id = campaign
            .campaign_id
            .unwrap_or_else(|| format!("campaign-{job_id}"));
        Ok(json!({
            "campaignId": campaign_id,
            "status": "queued",
            "queuedLeads": campaign.lead_ids.len(),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CleanupPayload {
    #[serde(default = "default_stale_days")]
    older_than_days: u32,
}

fn default_stale_days() -> u32 {
    30
}

/// `cleanup.stale` — stale-record cleanup summary.
pub struct CleanupStale;

#[async_trait]
impl JobHandler for CleanupStale {
    async fn execute(&self, payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        let cleanup: CleanupPayload = parse_payload(payload)?;
        Ok(json!({
            "status": "completed",
            "removed": 0,
            "olderThanDays": cleanup.older_than_days,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload {
    #[serde(default = "default_export_format")]
    format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

/// `export.generate` — export-started summary.
pub struct ExportGenerate;

#[async_trait]
impl JobHandler for ExportGenerate {
    async fn execute(&self, payload: &Value, job_id: JobId) -> Result<Value, HandlerError> {
        let export: ExportPayload = parse_payload(payload)?;
        Ok(json!({
            "exportId": format!("export-{job_id}"),
            "status": "started",
            "format": export.format,
        }))
    }
}

/// `analytics.aggregate` — metrics rollup summary.
pub struct AnalyticsAggregate;

#[async_trait]
impl JobHandler for AnalyticsAggregate {
    async fn execute(&self, _payload: &Value, _job_id: JobId) -> Result<Value, HandlerError> {
        Ok(json!({
            "status": "aggregated",
            "metrics": {"leads": 0, "enriched": 0, "scored": 0},
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signals_summary_has_a_stable_shape() {
        let result = SignalsAggregate
            .execute(&json!({}), JobId::new())
            .await
            .unwrap();
        assert_eq!(result["status"], "aggregated");
        assert!(result["signals"].is_object());
    }

    #[tokio::test]
    async fn campaign_uses_payload_id_when_present() {
        let result = OutreachCampaign
            .execute(
                &json!({"campaignId": "C9", "leadIds": ["L1", "L2"]}),
                JobId::new(),
            )
            .await
            .unwrap();
        assert_eq!(result["campaignId"], "C9");
        assert_eq!(result["status"], "queued");
        assert_eq!(result["queuedLeads"], 2);
    }

    #[tokio::test]
    async fn campaign_id_derives_from_job_id_when_absent() {
        let job_id = JobId::new();
        let result = OutreachCampaign.execute(&json!({}), job_id).await.unwrap();
        assert_eq!(result["campaignId"], format!("campaign-{job_id}"));
    }

    #[tokio::test]
    async fn cleanup_defaults_the_staleness_window() {
        let result = CleanupStale.execute(&json!({}), JobId::new()).await.unwrap();
        assert_eq!(result["olderThanDays"], 30);
        assert_eq!(result["status"], "completed");

        // An absent payload arrives as null and still runs with defaults.
        let result = CleanupStale
            .execute(&Value::Null, JobId::new())
            .await
            .unwrap();
        assert_eq!(result["olderThanDays"], 30);
    }

    #[tokio::test]
    async fn export_id_derives_from_job_id() {
        let job_id = JobId::new();
        let result = ExportGenerate
            .execute(&json!({"format": "jsonl"}), job_id)
            .await
            .unwrap();
        assert_eq!(result["exportId"], format!("export-{job_id}"));
        assert_eq!(result["format"], "jsonl");
        assert_eq!(result["status"], "started");
    }

    #[tokio::test]
    async fn analytics_summary_is_deterministic() {
        let a = AnalyticsAggregate.execute(&json!({}), JobId::new()).await.unwrap();
        let b = AnalyticsAggregate.execute(&json!({}), JobId::new()).await.unwrap();
        assert_eq!(a, b);
    }
}
