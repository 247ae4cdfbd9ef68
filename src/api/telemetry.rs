//! Simulated telemetry API
//!
//! GET /traffic-patterns/ and GET /historical-logs/ serve canned data for
//! the dashboard. No real analysis or persistence sits behind these; a real
//! deployment would back /historical-logs/ with a database.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// One simulated log entry
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: &'static str,
    pub event: &'static str,
}

/// Create telemetry routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/traffic-patterns/", get(traffic_patterns))
        .route("/historical-logs/", get(historical_logs))
}

/// Simulated traffic pattern summary
///
/// GET /traffic-patterns/
async fn traffic_patterns() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "latency_spike": "Detected at 3:42 PM (200ms spike)",
        "packet_loss_trend": "Consistent 5% packet loss in the last 30 min",
        "anomaly_frequency": "3 anomalies detected in the past hour"
    }))
}

/// Simulated historical log entries, oldest first
///
/// GET /historical-logs/
async fn historical_logs() -> Json<Vec<LogEntry>> {
    Json(vec![
        LogEntry {
            timestamp: "2025-02-10 14:00",
            event: "Ping to google.com - 50ms",
        },
        LogEntry {
            timestamp: "2025-02-10 14:05",
            event: "Traceroute anomaly detected",
        },
        LogEntry {
            timestamp: "2025-02-10 14:10",
            event: "Anomaly detected: high latency",
        },
    ])
}
