//! Configuration module
//!
//! Environment variable parsing and service constants

pub mod env;

pub use env::EnvConfig;
