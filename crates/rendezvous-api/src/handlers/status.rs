//! / and /status handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiState;

// ── / ───────────────────────────────────────────────────────────────────────

pub async fn handle_root() -> &'static str {
    "Rendezvous discovery server is running."
}

// ── /status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub communities: usize,
    pub liveness_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    pub uptime_secs: u64,
    pub version: String,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        communities: state.registry.count().await,
        liveness_timeout_secs: state.registry.liveness_timeout().as_secs(),
        sweep_interval_secs: state.sweep_interval.as_secs(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
