//! Health check handlers.

use axum::Json;
use axum::extract::State;

use coupondrop_core::traits::ledger::LedgerSnapshot;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/ledger
pub async fn ledger_health(State(state): State<AppState>) -> Json<ApiResponse<LedgerSnapshot>> {
    Json(ApiResponse::ok(state.coordinator.snapshot().await))
}
