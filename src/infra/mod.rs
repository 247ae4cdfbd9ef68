//! Infrastructure module
//!
//! External process invocation

pub mod probe_runner;

pub use probe_runner::{ProbeError, ProbeRunner};
