use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use leadflow_worker::{DispatchError, HistoryError};

/// Map a dispatch failure to an HTTP response.
///
/// An unknown job type is the caller's mistake (400); a handler failure
/// surfaces the original error message with a server-side status so the
/// delivery layer redelivers.
pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::UnknownJobType(_) => {
            json_error(StatusCode::BAD_REQUEST, "unknown_job_type", err.to_string())
        }
        DispatchError::Handler(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "job_failed", e.to_string())
        }
    }
}

/// Map a history lookup failure to an HTTP response. Absence is 404,
/// distinct from an internal error.
pub fn history_error_to_response(err: HistoryError) -> axum::response::Response {
    match err {
        HistoryError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
