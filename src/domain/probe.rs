//! Probe-related domain models

use serde::{Deserialize, Serialize};

use crate::config::env::constants::PING_COUNT;

/// Kind of diagnostic probe to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Ping,
    Traceroute,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Ping => "ping",
            ProbeKind::Traceroute => "traceroute",
        }
    }

    /// Fixed, non-configurable flag set per probe kind. The host is appended
    /// as the final argv element by the runner; flags are never derived from
    /// request input.
    ///
    /// `-n` keeps output numeric so parsing does not depend on the resolver.
    pub fn fixed_args(&self) -> Vec<String> {
        match self {
            ProbeKind::Ping => vec!["-n".to_string(), "-c".to_string(), PING_COUNT.to_string()],
            ProbeKind::Traceroute => vec!["-I".to_string(), "-n".to_string()],
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw outcome of one probe invocation. Created once per run, immutable
/// afterwards, owned by the request that spawned it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Process exit code; `None` if killed by signal or timeout
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock duration of the invocation (milliseconds)
    pub duration_ms: u64,
    /// Whether the process was killed for exceeding the allotted timeout.
    /// A timed-out probe is a normal structured outcome, not an error.
    pub timed_out: bool,
}

/// Structured result of a ping probe
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PingResult {
    pub host: String,
    pub packets_sent: u32,
    pub packets_received: u32,
    pub packet_loss_pct: f64,
    /// RTT statistics; `None` when the summary line was absent (e.g. the
    /// probe was killed mid-write or the output format was unrecognized)
    pub min_rtt_ms: Option<f64>,
    pub avg_rtt_ms: Option<f64>,
    pub max_rtt_ms: Option<f64>,
    pub raw: ProbeReport,
}

/// Structured result of a traceroute probe
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TracerouteResult {
    pub host: String,
    /// Hops in emission order, which equals path order source → destination
    pub hops: Vec<HopRecord>,
    pub raw: ProbeReport,
}

/// One hop reported by traceroute
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HopRecord {
    pub hop: u32,
    /// `None` for unresolvable hops (`* * *`)
    pub address: Option<String>,
    /// Per-packet round-trip times (milliseconds); empty when no reply
    pub rtt_ms: Vec<f64>,
}
