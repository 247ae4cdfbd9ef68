//! Probe output parsing
//!
//! Pure functions turning raw probe text into structured results. Parsers
//! are tolerant: truncated output (a probe killed by timeout mid-write)
//! degrades to a partial result, and only output with no recognizable
//! structure at all yields a [`ParseError`]. The caller decides whether to
//! fall back to the raw text.

pub mod ping;
pub mod traceroute;

/// Output did not match any recognized pattern. Never fatal; the raw report
/// always rides along in the final result.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn unrecognized(what: &str) -> Self {
        Self {
            reason: format!("unrecognized {} output", what),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ParseError {}
