use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness check. Never touches the spreadsheet.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
