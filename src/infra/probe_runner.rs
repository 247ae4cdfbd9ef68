//! Probe process execution
//!
//! Single entry point for invoking the external diagnostic binaries with:
//! - argument-vector invocation (no shell involved)
//! - timeout enforcement with partial-output capture
//! - cancellation support
//! - separated stdout/stderr

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::EnvConfig;
use crate::domain::{ProbeKind, ProbeReport};

/// Probe execution error. Timeouts are NOT represented here; a timed-out
/// probe yields a normal [`ProbeReport`] with `timed_out = true`.
#[derive(Debug)]
pub enum ProbeError {
    /// Probe binary missing or not executable
    ExecutableNotFound(String),
    /// OS-level failure to spawn
    SpawnFailed(std::io::Error),
    /// Failure while waiting for the child to exit
    WaitFailed(std::io::Error),
    /// Run aborted by shutdown or client disconnect
    Cancelled,
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::ExecutableNotFound(bin) => {
                write!(f, "Probe executable not found: {}", bin)
            }
            ProbeError::SpawnFailed(e) => write!(f, "Failed to spawn probe: {}", e),
            ProbeError::WaitFailed(e) => write!(f, "Failed to wait for probe: {}", e),
            ProbeError::Cancelled => write!(f, "Probe was cancelled"),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::SpawnFailed(e) | ProbeError::WaitFailed(e) => Some(e),
            _ => None,
        }
    }
}

/// Probe executor
///
/// Holds only the binary paths and the configured timeout; each call spawns
/// exactly one OS process owned by the calling request.
#[derive(Clone, Debug)]
pub struct ProbeRunner {
    ping_bin: String,
    traceroute_bin: String,
    timeout: Duration,
}

impl ProbeRunner {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            ping_bin: config.ping_bin.clone(),
            traceroute_bin: config.traceroute_bin.clone(),
            timeout: config.probe_timeout,
        }
    }

    fn bin_for(&self, kind: ProbeKind) -> &str {
        match kind {
            ProbeKind::Ping => &self.ping_bin,
            ProbeKind::Traceroute => &self.traceroute_bin,
        }
    }

    /// Run one probe against an already-validated host.
    ///
    /// The host is appended as the final argv element after the fixed flag
    /// set; flags are never derived from request input.
    ///
    /// Returns a [`ProbeReport`] on normal exit AND on timeout (with the
    /// output captured so far and `timed_out = true`).
    pub async fn run(
        &self,
        kind: ProbeKind,
        host: &str,
        cancel: CancellationToken,
    ) -> Result<ProbeReport, ProbeError> {
        let bin = self.bin_for(kind);
        let mut args = kind.fixed_args();
        args.push(host.to_string());

        debug!(probe = %kind, bin = %bin, host = %host, "Spawning probe");
        let result = self.run_process(bin, &args, cancel).await;

        if let Ok(report) = &result {
            debug!(
                probe = %kind,
                host = %host,
                exit_code = ?report.exit_code,
                timed_out = report.timed_out,
                duration_ms = report.duration_ms,
                "Probe finished"
            );
        }
        result
    }

    /// Spawn `bin` with `args`, capture stdout/stderr concurrently, and wait
    /// for exit, timeout or cancellation. Nothing here passes through a
    /// shell, so metacharacters in argv are never interpreted.
    async fn run_process(
        &self,
        bin: &str,
        args: &[String],
        cancel: CancellationToken,
    ) -> Result<ProbeReport, ProbeError> {
        let started = Instant::now();
        let mut child = Command::new(bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reaps the child if the owning request future is dropped
            // (client disconnect)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    ProbeError::ExecutableNotFound(bin.to_string())
                }
                _ => ProbeError::SpawnFailed(e),
            })?;

        // Readers run concurrently with the wait so that partial output
        // survives a timeout kill
        let stdout = child.stdout.take();
        let stdout_task = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        });

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        });

        let (exit_code, timed_out) = tokio::select! {
            _ = cancel.cancelled() => {
                warn!(bin = %bin, "Probe cancelled, killing process");
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(ProbeError::Cancelled);
            }
            _ = tokio::time::sleep(self.timeout) => {
                warn!(bin = %bin, timeout = ?self.timeout, "Probe timed out, killing process");
                let _ = child.kill().await;
                // Reap so no zombie is left behind. A timeout is a normal
                // structured outcome, so a reap failure degrades to an
                // unknown exit code rather than an error (kill_on_drop
                // still covers cleanup).
                let exit_code = match child.wait().await {
                    Ok(status) => status.code(),
                    Err(e) => {
                        warn!(bin = %bin, error = %e, "Failed to reap timed-out probe");
                        None
                    }
                };
                (exit_code, true)
            }
            status = child.wait() => {
                let status = status.map_err(ProbeError::WaitFailed)?;
                (status.code(), false)
            }
        };

        // Killing the child closes its pipes, so the readers terminate
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ProbeReport {
            exit_code,
            stdout,
            stderr,
            duration_ms: started.elapsed().as_millis() as u64,
            timed_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(timeout: Duration) -> ProbeRunner {
        ProbeRunner {
            ping_bin: "ping".to_string(),
            traceroute_bin: "traceroute".to_string(),
            timeout,
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_process_captures_stdout() {
        let report = runner(Duration::from_secs(5))
            .run_process("echo", &args(&["hello", "probe"]), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.exit_code, Some(0));
        assert!(!report.timed_out);
        assert!(report.stdout.contains("hello probe"));
        assert!(report.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_executable_not_found() {
        let result = runner(Duration::from_secs(5))
            .run_process(
                "netdiag-no-such-binary-12345",
                &args(&[]),
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(ProbeError::ExecutableNotFound(_))));
    }

    #[tokio::test]
    async fn test_timeout_returns_structured_report() {
        let started = Instant::now();
        let report = runner(Duration::from_millis(200))
            .run_process("sleep", &args(&["60"]), CancellationToken::new())
            .await
            .unwrap();

        assert!(report.timed_out);
        // Killed by signal: no exit code, still a structured report
        assert_eq!(report.exit_code, None);
        // Bounded overhead beyond the timeout itself
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_cancellation_kills_probe() {
        let cancel = CancellationToken::new();
        let child_token = cancel.child_token();
        let r = runner(Duration::from_secs(30));
        let handle =
            tokio::spawn(async move { r.run_process("sleep", &args(&["60"]), child_token).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ProbeError::Cancelled)));
    }

    #[tokio::test]
    async fn test_metacharacters_never_reach_a_shell() {
        // argv invocation: the "payload" is a literal argument to echo, not
        // an executed command
        let report = runner(Duration::from_secs(5))
            .run_process(
                "echo",
                &args(&["; touch /tmp/netdiag-pwned"]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(report.stdout.contains("; touch /tmp/netdiag-pwned"));
        assert!(!std::path::Path::new("/tmp/netdiag-pwned").exists());
    }
}
