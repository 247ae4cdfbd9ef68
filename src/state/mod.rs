//! Runtime state module

pub mod app_state;

pub use app_state::{get_shutdown_token, trigger_shutdown, AppState};
