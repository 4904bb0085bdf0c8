//! Job description and lifecycle record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::JobId;

/// Inbound job description.
///
/// Consumed once at dispatch time; not persisted as an entity itself. The
/// `type` field selects the handler, the payload is opaque to the dispatcher
/// and interpreted only by the handler it is routed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Where the job came from (push delivery, manual trigger, ...). Opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl JobRequest {
    pub fn new(job_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            job_type: job_type.into(),
            payload,
            source: None,
            triggered_at: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Job execution status.
///
/// `Completed` and `Failed` are terminal; a record transitions out of
/// `Processing` exactly once and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Handler is running (or about to run).
    Processing,
    /// Handler returned a result.
    Completed,
    /// Handler raised, or no handler was registered for the type.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Lifecycle record of one dispatched job — the unit of state in the history
/// store.
///
/// `completed_at`/`result` and `failed_at`/`error` are mutually exclusive;
/// `duration_ms` is set at the terminal transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Retained verbatim for inspection.
    pub payload: serde_json::Value,
}

impl JobRecord {
    /// Create the initial `processing` record for a freshly dispatched job.
    pub fn processing(id: JobId, request: &JobRequest) -> Self {
        Self {
            id,
            job_type: request.job_type.clone(),
            status: JobStatus::Processing,
            started_at: Utc::now(),
            completed_at: None,
            failed_at: None,
            duration_ms: None,
            result: None,
            error: None,
            payload: request.payload.clone(),
        }
    }

    /// Transition to `completed` with the handler's result.
    pub fn mark_completed(&mut self, result: serde_json::Value) {
        let now = Utc::now();
        self.status = JobStatus::Completed;
        self.completed_at = Some(now);
        self.duration_ms = Some(self.elapsed_ms(now));
        self.result = Some(result);
    }

    /// Transition to `failed` with the failure message.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        let now = Utc::now();
        self.status = JobStatus::Failed;
        self.failed_at = Some(now);
        self.duration_ms = Some(self.elapsed_ms(now));
        self.error = Some(error.into());
    }

    fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_milliseconds().max(0) as u64
    }
}
