use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use prometheus::TextEncoder;
use serde_json::json;

use crate::utils::Metrics;

/// Health Check Endpoint
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Readiness Check Endpoint
pub async fn ready() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "ready": true,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Prometheus Metrics Endpoint
pub async fn metrics(State(metrics): State<Arc<Metrics>>) -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let mut body = String::new();
    match encoder.encode_utf8(&metrics.registry().gather(), &mut body) {
        Ok(()) => (StatusCode::OK, body),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

/// Router for Admin/Health Endpoints
pub fn admin_router(metrics_state: Arc<Metrics>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .with_state(metrics_state)
}
