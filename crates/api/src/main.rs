use std::sync::Arc;

use leadflow_worker::DownstreamConfig;

#[tokio::main]
async fn main() {
    leadflow_observability::init();

    let services = leadflow_api::app::services::build_services(DownstreamConfig::from_env())
        .expect("failed to build downstream client");
    let app = leadflow_api::app::build_app(Arc::new(services));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind 0.0.0.0:{port}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
