//! netdiag-agent - network diagnostics agent
//!
//! Exposes ping/traceroute probes and a pre-trained anomaly classifier
//! over HTTP for the dashboard frontend.

pub mod error;
pub mod infra;
pub mod domain;
pub mod config;
pub mod state;
pub mod api;
pub mod services;
