// SPDX-License-Identifier: MIT

//! Debugger adapter daemon: binds the [`connection`] loop (Request
//! Dispatcher + Event Pump) to a TCP listener. The binary entry point
//! ([`crate`]'s `main.rs`) owns argument parsing and process exit codes;
//! this library owns everything from "a socket was accepted" onward.

pub mod breakpoints;
pub mod connection;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod memory;
pub mod process;
pub mod pump;
pub mod threads;
pub mod values;

use std::sync::Arc;

use adapter_engine::Engine;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Accept connections on `listener` one at a time, serving each to
/// completion before accepting the next. A peer that connects while one is
/// already being served just sits in the OS backlog until its turn.
pub async fn serve(listener: TcpListener, engine: Arc<dyn Engine>, max_frame_bytes: u32) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(error = %err, "accept failed");
                continue;
            }
        };
        info!(%peer, "accepted connection");
        if let Err(err) = socket.set_nodelay(true) {
            warn!(error = %err, "failed to set TCP_NODELAY");
        }
        let (reader, writer) = socket.into_split();
        // Block the accept loop for the lifetime of this connection rather
        // than spawning a sibling task that would race it for the engine.
        connection::run(reader, writer, Arc::clone(&engine), max_frame_bytes).await;
        info!(%peer, "connection ended");
    }
}
