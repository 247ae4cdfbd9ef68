//! Application state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::config::EnvConfig;
use crate::services::{AnomalyClassifier, DiagnosticsService};

/// Global shutdown token, used to wind down in-flight probes on exit
static GLOBAL_SHUTDOWN: std::sync::OnceLock<CancellationToken> = std::sync::OnceLock::new();

/// Get the global shutdown token
pub fn get_shutdown_token() -> CancellationToken {
    GLOBAL_SHUTDOWN.get_or_init(CancellationToken::new).clone()
}

/// Trigger global shutdown
pub fn trigger_shutdown() {
    if let Some(token) = GLOBAL_SHUTDOWN.get() {
        token.cancel();
    }
}

/// Application state
pub struct AppState {
    /// Environment configuration
    pub config: EnvConfig,
    /// Service start time
    pub started_at: DateTime<Utc>,
    /// Diagnostics façade (ping / traceroute)
    pub diagnostics: DiagnosticsService,
    /// Classifier artifact, loaded once at startup; `None` when the artifact
    /// is absent. Read-only afterwards, so no locking is needed.
    pub classifier: Option<Arc<AnomalyClassifier>>,
}

impl AppState {
    /// Create new application state from the environment
    pub fn new() -> Self {
        let config = EnvConfig::from_env();

        tracing::info!(
            port = config.port,
            probe_timeout = ?config.probe_timeout,
            ping_bin = %config.ping_bin,
            traceroute_bin = %config.traceroute_bin,
            model_path = %config.model_path,
            "Loaded configuration"
        );

        let diagnostics = DiagnosticsService::new(&config);
        let classifier = AnomalyClassifier::load(&config.model_path).map(Arc::new);

        Self {
            config,
            started_at: Utc::now(),
            diagnostics,
            classifier,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
