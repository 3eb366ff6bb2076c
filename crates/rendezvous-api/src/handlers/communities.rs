//! /communities handlers — register, heartbeat, list.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use rendezvous_services::Community;

use super::{reject, ApiError, ApiState, JsonBody};

// ── /communities (GET) ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityInfo {
    pub name: String,
    pub description: String,
    pub onion_address: String,
    /// Milliseconds since the UNIX epoch.
    pub last_seen: u64,
}

impl From<Community> for CommunityInfo {
    fn from(c: Community) -> Self {
        Self {
            name: c.name,
            description: c.description,
            onion_address: c.address,
            last_seen: c.last_seen,
        }
    }
}

pub async fn handle_list(State(state): State<ApiState>) -> Json<Vec<CommunityInfo>> {
    let communities = state
        .registry
        .list()
        .await
        .into_iter()
        .map(CommunityInfo::from)
        .collect();

    Json(communities)
}

// ── /communities (POST) ───────────────────────────────────────────────────────

/// Missing fields are treated as empty, so an absent address is reported as
/// an invalid address rather than a malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "address")]
    pub onion_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub count: usize,
}

pub async fn handle_register(
    State(state): State<ApiState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let count = state
        .registry
        .register(
            req.onion_address.as_deref().unwrap_or_default(),
            req.name.as_deref().unwrap_or_default(),
            req.description.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, address = ?req.onion_address, "register rejected");
            reject(e)
        })?;

    Ok(Json(RegisterResponse {
        status: "registered".to_string(),
        count,
    }))
}

// ── /communities/heartbeat (POST) ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    #[serde(alias = "address")]
    pub onion_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub status: String,
}

pub async fn handle_heartbeat(
    State(state): State<ApiState>,
    JsonBody(req): JsonBody<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    state
        .registry
        .heartbeat(req.onion_address.as_deref().unwrap_or_default())
        .await
        .map_err(reject)?;

    Ok(Json(HeartbeatResponse {
        status: "ok".to_string(),
    }))
}
