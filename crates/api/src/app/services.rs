//! Worker wiring for the HTTP layer.

use std::sync::Arc;

use leadflow_worker::{
    handlers, Dispatcher, DownstreamConfig, DownstreamError, HttpDownstreamClient, JobHistory,
};

/// Shared application services, injected into routes via `Extension`.
pub struct AppServices {
    pub dispatcher: Dispatcher,
}

/// Construct the worker stack: one history store, one downstream client, a
/// dispatcher with the full handler table.
pub fn build_services(config: DownstreamConfig) -> Result<AppServices, DownstreamError> {
    let client = Arc::new(HttpDownstreamClient::new(config)?);
    let history = Arc::new(JobHistory::new());
    let dispatcher = handlers::build_dispatcher(history, client);

    tracing::info!(job_types = dispatcher.job_types().len(), "job dispatcher ready");
    Ok(AppServices { dispatcher })
}
