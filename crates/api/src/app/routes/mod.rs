use axum::{
    routing::{get, post},
    Router,
};

pub mod jobs;
pub mod push;
pub mod system;

/// Router for the job endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/push", post(push::receive))
        .route("/jobs", post(jobs::trigger).get(jobs::list))
        .route("/jobs/:id", get(jobs::status))
}
