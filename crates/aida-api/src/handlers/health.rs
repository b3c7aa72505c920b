//! Health check handler and response type.

use axum::Json;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "gateway".to_string(),
    })
}
