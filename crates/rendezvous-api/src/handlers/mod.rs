//! HTTP API handlers — exposes the community registry as JSON.

pub mod communities;
pub mod status;

use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use rendezvous_core::RegistryError;
use rendezvous_services::SharedRegistry;

#[derive(Clone)]
pub struct ApiState {
    pub registry: SharedRegistry,
    /// Reaper period, reported by /status.
    pub sweep_interval: Duration,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(registry: SharedRegistry, sweep_interval: Duration) -> Self {
        Self {
            registry,
            sweep_interval,
            started_at: Instant::now(),
        }
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a registry error to a client rejection.
fn reject(err: RegistryError) -> ApiError {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::NOT_FOUND
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// JSON request body that falls back to `T::default()` when the request is
/// not declared as JSON, so clients that omit the content type get the usual
/// field-level rejections instead of a 415. A body that claims to be JSON but
/// does not parse is still rejected.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Ok(Self(T::default()));
        }
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

// Re-export handler functions for use in router setup.
pub use communities::{handle_heartbeat, handle_list, handle_register};
pub use status::{handle_root, handle_status};
