// src/api/http/health.rs
//
// Health check endpoint for load balancers and probes.

use axum::{Json, response::IntoResponse};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
    }))
}
