use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use tracing::debug;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// `POST /push` — push-delivery endpoint.
///
/// A 2xx acknowledges the delivery; anything else makes the delivery layer
/// redeliver (that layer owns retries, not the worker).
pub async fn receive(
    Extension(services): Extension<Arc<AppServices>>,
    Json(envelope): Json<dto::PushEnvelope>,
) -> axum::response::Response {
    let request = match envelope.decode_job() {
        Ok(request) => request,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_envelope", e),
    };

    debug!(
        job_type = %request.job_type,
        message_id = envelope.message.message_id.as_deref().unwrap_or(""),
        "push delivery received"
    );

    match services.dispatcher.process(request).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
