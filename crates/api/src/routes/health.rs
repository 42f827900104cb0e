//! Liveness endpoint for the order-management API.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /health — reports the server as alive. Never touches the store;
/// readiness against the database is checked elsewhere.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "order-management-api",
    })
}
