//! API module
//!
//! HTTP handlers and router assembly

pub mod anomaly;
pub mod diagnostics;
pub mod health;
pub mod telemetry;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full API router
///
/// CORS is wide open: the browser dashboard is served from a different
/// origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & status
        .merge(health::router())
        // Ping / traceroute
        .merge(diagnostics::router())
        // Anomaly prediction
        .merge(anomaly::router())
        // Simulated telemetry
        .merge(telemetry::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
