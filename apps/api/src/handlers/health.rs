use axum::Json;

use crate::dto::{ApiEnvelope, HealthResponse};

/// GET /health - Liveness probe, no authentication.
pub async fn health_handler() -> Json<ApiEnvelope<HealthResponse>> {
    Json(ApiEnvelope::ok(
        "Service is healthy.",
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}
