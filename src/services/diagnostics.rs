//! Diagnostics façade
//!
//! Composes host validation, the probe runner and the output parsers into
//! the two operations the HTTP layer exposes. Each request moves through
//! validate → run → parse exactly once; no state is retried or revisited.
//!
//! Error policy: validation and executable-availability failures surface as
//! `ApiError`s; timeouts and parse failures are absorbed into best-effort
//! structured results with the raw report attached. Diagnostics run against
//! unreliable targets by nature, so partial data beats a hard failure.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::EnvConfig;
use crate::domain::{host, PingResult, ProbeKind, ProbeReport, TracerouteResult};
use crate::error::ApiError;
use crate::infra::{ProbeError, ProbeRunner};

use super::parser;

/// Diagnostics service
#[derive(Clone, Debug)]
pub struct DiagnosticsService {
    runner: ProbeRunner,
}

impl DiagnosticsService {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            runner: ProbeRunner::new(config),
        }
    }

    /// Ping a host and return structured statistics.
    pub async fn ping(
        &self,
        host: &str,
        cancel: CancellationToken,
    ) -> Result<PingResult, ApiError> {
        let host = host::validate(host).map_err(ApiError::bad_request)?;
        let raw = self.run_probe(ProbeKind::Ping, host, cancel).await?;

        let result = match parser::ping::parse(&raw) {
            Ok(stats) => PingResult {
                host: host.to_string(),
                packets_sent: stats.packets_sent,
                packets_received: stats.packets_received,
                packet_loss_pct: stats.packet_loss_pct,
                min_rtt_ms: stats.min_rtt_ms,
                avg_rtt_ms: stats.avg_rtt_ms,
                max_rtt_ms: stats.max_rtt_ms,
                raw,
            },
            Err(e) => {
                // Unresolvable or silent target: report total loss, keep the
                // raw text as the fallback
                warn!(host = %host, error = %e, "Ping output not recognized, returning fallback result");
                PingResult {
                    host: host.to_string(),
                    packets_sent: 0,
                    packets_received: 0,
                    packet_loss_pct: 100.0,
                    min_rtt_ms: None,
                    avg_rtt_ms: None,
                    max_rtt_ms: None,
                    raw,
                }
            }
        };

        info!(
            host = %host,
            loss_pct = result.packet_loss_pct,
            timed_out = result.raw.timed_out,
            "Ping completed"
        );
        Ok(result)
    }

    /// Trace the route to a host and return the hops seen.
    pub async fn traceroute(
        &self,
        host: &str,
        cancel: CancellationToken,
    ) -> Result<TracerouteResult, ApiError> {
        let host = host::validate(host).map_err(ApiError::bad_request)?;
        let raw = self.run_probe(ProbeKind::Traceroute, host, cancel).await?;

        let hops = match parser::traceroute::parse(&raw) {
            Ok(hops) => hops,
            Err(e) => {
                warn!(host = %host, error = %e, "Traceroute output not recognized, returning fallback result");
                Vec::new()
            }
        };

        info!(
            host = %host,
            hops = hops.len(),
            timed_out = raw.timed_out,
            "Traceroute completed"
        );
        Ok(TracerouteResult {
            host: host.to_string(),
            hops,
            raw,
        })
    }

    async fn run_probe(
        &self,
        kind: ProbeKind,
        host: &str,
        cancel: CancellationToken,
    ) -> Result<ProbeReport, ApiError> {
        self.runner.run(kind, host, cancel).await.map_err(|e| match e {
            ProbeError::ExecutableNotFound(bin) => {
                warn!(probe = %kind, bin = %bin, "Probe executable unavailable");
                ApiError::service_unavailable(format!("{} is not available on this host", kind))
            }
            ProbeError::Cancelled => ApiError::internal("probe cancelled".to_string()),
            other => ApiError::internal(other.to_string()),
        })
    }
}
