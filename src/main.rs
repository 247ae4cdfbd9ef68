//! netdiag-agent - network diagnostics agent
//!
//! Usage:
//! - Normal mode: `netdiag-agent`
//! - With custom port: `netdiag-agent --port 9000`
//!
//! Configuration comes from the environment (PORT, PROBE_TIMEOUT_SECS,
//! PING_BIN, TRACEROUTE_BIN, MODEL_PATH); `--port` overrides PORT.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use netdiag_agent::state::{get_shutdown_token, trigger_shutdown, AppState};

/// Parse command line arguments
fn parse_args() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    let mut port_override = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    port_override
}

fn print_help() {
    println!("netdiag-agent - network diagnostics agent");
    println!();
    println!("USAGE:");
    println!("    netdiag-agent [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    PORT                 Listening port (default 8000)");
    println!("    PROBE_TIMEOUT_SECS   Per-probe timeout, capped at 30 (default 10)");
    println!("    PING_BIN             Ping binary (default: ping)");
    println!("    TRACEROUTE_BIN       Traceroute binary (default: traceroute)");
    println!("    MODEL_PATH           Classifier artifact (default: network_anomaly_model.json)");
}

fn main() {
    let port_override = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        run(port_override).await;
    });
}

async fn run(port_override: Option<u16>) {
    let mut state = AppState::new();
    if let Some(port) = port_override {
        state.config.port = port;
    }
    let port = state.config.port;

    let app = netdiag_agent::api::router(Arc::new(state));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %addr, "netdiag-agent listening");

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = serve_result {
        tracing::error!(error = %e, "Server error");
    }
}

/// Wait for ctrl-c, then cancel the global token so in-flight probes are
/// killed before the server finishes draining connections.
async fn shutdown_signal() {
    // Materialize the token before waiting so in-flight requests branch off
    // the same one
    let _ = get_shutdown_token();

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }

    tracing::info!("Shutdown signal received, cancelling in-flight probes");
    trigger_shutdown();
}
