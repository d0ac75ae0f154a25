use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::helpers::time::now_rfc3339;
use crate::report::service::PayloadStatus;
use crate::server::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub payloads: PayloadStatus,
    pub active_tokens: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy",
        timestamp: now_rfc3339(),
        payloads: state.reports.payload_status(),
        active_tokens: state.auth.active_token_count().await,
    })
}
