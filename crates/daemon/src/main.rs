// SPDX-License-Identifier: MIT

//! `adapterd` entry point: takes exactly one positional argument, a TCP
//! port, and serves a single debugger adapter connection at a time.
//!
//! Exit codes: `0` normal, `1` invalid argument, `2` bind failure, `3`
//! engine load failure.

use std::process::ExitCode;
use std::sync::Arc;

use adapter_engine::{Engine, NullEngine};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_new(adapter_daemon::env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Parse the single positional port argument: a decimal integer in 1-65535.
fn parse_port(args: &[String]) -> Result<u16, String> {
    let arg = args.get(1).ok_or_else(|| "usage: adapterd <port>".to_string())?;
    let port: u32 = arg.parse().map_err(|_| format!("'{arg}' is not a valid port number"))?;
    u16::try_from(port).map_err(|_| format!("port {port} is out of range 1-65535")).and_then(|p| {
        if p == 0 {
            Err("port 0 is not a valid port".to_string())
        } else {
            Ok(p)
        }
    })
}

/// Load the configured LLDB-compatible engine library, or fall back to the
/// in-memory [`NullEngine`] when none is configured. Binding a real engine
/// library by dynamic symbol resolution is outside this crate's boundary;
/// the hook exists so a concrete binding can be wired in without touching
/// the dispatcher.
fn load_engine() -> Result<Arc<dyn Engine>, String> {
    match std::env::var("ADAPTERD_ENGINE_LIB") {
        Ok(path) if !path.is_empty() => {
            Err(format!("no concrete engine binding compiled in; cannot load '{path}'"))
        }
        _ => Ok(Arc::new(NullEngine::new())),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let port = match parse_port(&args) {
        Ok(port) => port,
        Err(message) => {
            error!(%message, "invalid argument");
            return ExitCode::from(1);
        }
    };

    let engine = match load_engine() {
        Ok(engine) => engine,
        Err(message) => {
            error!(%message, "engine load failure");
            return ExitCode::from(3);
        }
    };

    let addr = (std::net::Ipv4Addr::LOCALHOST, port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, port, "bind failure");
            return ExitCode::from(2);
        }
    };

    info!(port, "adapterd listening");
    let max_frame_bytes = adapter_daemon::env::max_frame_bytes();
    adapter_daemon::serve(listener, engine, max_frame_bytes).await;
    ExitCode::SUCCESS
}
