//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: worker wiring (history store, downstream client, dispatcher)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and push-envelope decoding
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
}
