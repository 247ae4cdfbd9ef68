//! Environment variable configuration loading

use std::env;
use std::time::Duration;

/// Environment configuration
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// HTTP listen port
    pub port: u16,
    /// Per-probe timeout. Supplied by configuration, never by the caller,
    /// and clamped to [1, MAX_PROBE_TIMEOUT_SECS].
    pub probe_timeout: Duration,
    /// Path or name of the ping binary
    pub ping_bin: String,
    /// Path or name of the traceroute binary
    pub traceroute_bin: String,
    /// Path to the anomaly classifier artifact
    pub model_path: String,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);

        let timeout_secs: u64 = env::var("PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_PROBE_TIMEOUT_SECS)
            .clamp(1, constants::MAX_PROBE_TIMEOUT_SECS);

        let ping_bin = env::var("PING_BIN").unwrap_or_else(|_| "ping".to_string());
        let traceroute_bin =
            env::var("TRACEROUTE_BIN").unwrap_or_else(|_| "traceroute".to_string());

        let model_path = env::var("MODEL_PATH")
            .unwrap_or_else(|_| "network_anomaly_model.json".to_string());

        Self {
            port,
            probe_timeout: Duration::from_secs(timeout_secs),
            ping_bin,
            traceroute_bin,
            model_path,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            probe_timeout: Duration::from_secs(constants::DEFAULT_PROBE_TIMEOUT_SECS),
            ping_bin: "ping".to_string(),
            traceroute_bin: "traceroute".to_string(),
            model_path: "network_anomaly_model.json".to_string(),
        }
    }
}

pub mod constants {
    /// Default per-probe timeout (seconds)
    pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

    /// Hard cap on the per-probe timeout (seconds)
    pub const MAX_PROBE_TIMEOUT_SECS: u64 = 30;

    /// Number of echo requests sent per ping probe
    pub const PING_COUNT: u32 = 4;

    /// Service name reported by /health
    pub const SERVICE_NAME: &str = "netdiag-agent";

    /// Service version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
