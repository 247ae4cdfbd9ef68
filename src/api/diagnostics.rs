//! Diagnostics API
//!
//! GET /ping/:host and GET /traceroute/:host

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{PingResult, TracerouteResult};
use crate::error::ApiResult;
use crate::state::{get_shutdown_token, AppState};

/// Response envelope for GET /ping/:host
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub host: String,
    pub output: PingResult,
}

/// Response envelope for GET /traceroute/:host
#[derive(Debug, Serialize)]
pub struct TracerouteResponse {
    pub host: String,
    pub output: TracerouteResult,
}

/// Create diagnostics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping/:host", get(ping_host))
        .route("/traceroute/:host", get(traceroute_host))
}

/// Run a ping probe against a host
///
/// GET /ping/:host
///
/// The probe is bounded by the configured timeout; a timed-out or
/// unreachable target still yields a structured result, never a 500.
async fn ping_host(
    Path(host): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PingResponse>> {
    // Child token: shutdown cancels the probe, the probe never cancels
    // anything else
    let cancel = get_shutdown_token().child_token();
    let output = state.diagnostics.ping(&host, cancel).await?;

    Ok(Json(PingResponse {
        host: output.host.clone(),
        output,
    }))
}

/// Run a traceroute probe against a host
///
/// GET /traceroute/:host
async fn traceroute_host(
    Path(host): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TracerouteResponse>> {
    let cancel = get_shutdown_token().child_token();
    let output = state.diagnostics.traceroute(&host, cancel).await?;

    Ok(Json(TracerouteResponse {
        host: output.host.clone(),
        output,
    }))
}
