// SPDX-License-Identifier: MIT

//! Per-connection orchestration: owns the two-task split — this task drives
//! the read/dispatch/respond loop, a sibling task runs the [`crate::pump`]
//! Event Pump — joined only by the [`SessionContext`]'s write mutex. Both
//! tasks end when either the socket closes or the other panics; there is no
//! supervision beyond that, matching a single connection being the daemon's
//! whole unit of work.

use std::sync::Arc;

use adapter_engine::Engine;
use adapter_wire::ProtocolError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::SessionContext;
use crate::dispatch;
use crate::error::ConnectionError;

/// Drive one connection to completion. `reader`/`writer` are the split
/// halves of the accepted socket; `engine` is shared across connections —
/// only one is ever active at a time, but the facade itself is
/// stateless-by-handle and safe to share.
pub async fn run<R, W>(reader: R, writer: W, engine: Arc<dyn Engine>, max_frame_bytes: u32)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let ctx = Arc::new(SessionContext::new(engine, writer, max_frame_bytes));
    let events = ctx.engine.subscribe();
    let cancel = CancellationToken::new();

    let pump_ctx = Arc::clone(&ctx);
    let pump_cancel = cancel.clone();
    let pump_handle = tokio::spawn(crate::pump::run(pump_ctx, events, pump_cancel));

    if let Err(err) = read_loop(reader, &ctx, max_frame_bytes).await {
        log_connection_error(err);
    }

    cancel.cancel();
    let _ = pump_handle.await;
    debug!("connection closed");
}

async fn read_loop<R, W>(
    mut reader: R,
    ctx: &Arc<SessionContext<W>>,
    max_frame_bytes: u32,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    loop {
        let bytes = match adapter_wire::read_message_limited(&mut reader, max_frame_bytes).await {
            Ok(bytes) => bytes,
            Err(ProtocolError::Truncated) => {
                info!("client closed the connection");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let response = dispatch::handle_frame(ctx, &bytes).await;
        if let Err(err) = ctx.send_frame(&response).await {
            warn!(error = %err, "failed to write response; dropping connection");
            return Err(err.into());
        }
    }
}

fn log_connection_error(err: ConnectionError) {
    match &err {
        ConnectionError::Protocol(ProtocolError::Truncated) => debug!("connection truncated mid-frame"),
        ConnectionError::Protocol(ProtocolError::Io(io_err))
            if io_err.kind() == std::io::ErrorKind::UnexpectedEof =>
        {
            debug!("connection closed")
        }
        _ => warn!(error = %err, "connection ended with an error"),
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
