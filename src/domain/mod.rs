//! Domain model module
//!
//! Plain data structures, no axum/tokio dependencies

pub mod anomaly;
pub mod host;
pub mod probe;

// Re-exports for convenience
pub use anomaly::AnomalyQuery;
pub use probe::{HopRecord, PingResult, ProbeKind, ProbeReport, TracerouteResult};
