use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use leadflow_core::{JobId, JobRequest};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// `POST /jobs` — manually trigger one job and wait for its outcome.
pub async fn trigger(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<JobRequest>,
) -> axum::response::Response {
    let mut request = request;
    request.source.get_or_insert_with(|| "manual".to_string());

    match services.dispatcher.process(request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// `GET /jobs/:id` — lifecycle record for one job.
pub async fn status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: JobId = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_job_id", e.to_string())
        }
    };

    match services.dispatcher.status(id) {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::history_error_to_response(e),
    }
}

/// `GET /jobs?limit=N` — most recent jobs, newest first.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::RecentQuery>,
) -> axum::response::Response {
    Json(services.dispatcher.recent_jobs(query.limit)).into_response()
}
