//! Job routing and lifecycle recording.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use leadflow_core::{JobId, JobRecord, JobRequest, JobStatus};

use crate::downstream::DownstreamError;
use crate::history::{HistoryError, JobHistory};

/// Default number of records returned by [`Dispatcher::recent_jobs`].
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Handler-level failure.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Downstream(#[from] DownstreamError),
}

impl HandlerError {
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }
}

/// Dispatch failure surfaced to the caller.
///
/// A handler failure is always recorded in the history first, then re-raised
/// here; the dispatcher never swallows it.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown job type: {0}")]
    UnknownJobType(String),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// One unit of work bound to a job type.
///
/// Receives the opaque payload and the generated job id; returns a JSON
/// result or fails. Handlers that iterate independent sub-units must isolate
/// each sub-unit's failure; single-unit handlers propagate directly.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn execute(&self, payload: &Value, job_id: JobId) -> Result<Value, HandlerError>;
}

/// What `process()` returns to the caller on success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub id: JobId,
    pub status: JobStatus,
    pub duration_ms: u64,
    pub result: Value,
}

/// Routes job descriptions to registered handlers and records lifecycle and
/// outcome in the shared history store.
pub struct Dispatcher {
    history: Arc<JobHistory>,
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl Dispatcher {
    pub fn new(history: Arc<JobHistory>) -> Self {
        Self {
            history,
            handlers: HashMap::new(),
        }
    }

    /// Bind a handler to a job type name. Last registration wins.
    pub fn register(&mut self, job_type: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.handlers.insert(job_type.into(), handler);
    }

    /// Registered job type names (for introspection/logging).
    pub fn job_types(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn history(&self) -> &Arc<JobHistory> {
        &self.history
    }

    /// Dispatch one job: record `processing`, run the handler, record the
    /// terminal state, return the outcome or re-raise the failure.
    ///
    /// The terminal record is written before this returns, so a caller that
    /// observes the return (or the error) can immediately read it via
    /// [`Dispatcher::status`].
    pub async fn process(&self, request: JobRequest) -> Result<ProcessOutcome, DispatchError> {
        let id = JobId::new();
        let mut record = JobRecord::processing(id, &request);
        self.history.put(record.clone());

        info!(job_id = %id, job_type = %request.job_type, "job started");

        let Some(handler) = self.handlers.get(&request.job_type) else {
            let err = DispatchError::UnknownJobType(request.job_type.clone());
            warn!(job_id = %id, job_type = %request.job_type, "no handler for job type");
            record.mark_failed(err.to_string());
            self.history.put(record);
            return Err(err);
        };

        match handler.execute(&request.payload, id).await {
            Ok(result) => {
                record.mark_completed(result.clone());
                let duration_ms = record.duration_ms.unwrap_or(0);
                self.history.put(record);
                info!(job_id = %id, job_type = %request.job_type, duration_ms, "job completed");
                Ok(ProcessOutcome {
                    id,
                    status: JobStatus::Completed,
                    duration_ms,
                    result,
                })
            }
            Err(err) => {
                record.mark_failed(err.to_string());
                self.history.put(record);
                warn!(job_id = %id, job_type = %request.job_type, error = %err, "job failed");
                Err(err.into())
            }
        }
    }

    /// Current lifecycle record for a job.
    pub fn status(&self, id: JobId) -> Result<JobRecord, HistoryError> {
        debug!(job_id = %id, "status lookup");
        self.history.get(id)
    }

    /// Most recent jobs, newest first.
    pub fn recent_jobs(&self, limit: Option<usize>) -> Vec<JobRecord> {
        self.history.recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
    }
}
