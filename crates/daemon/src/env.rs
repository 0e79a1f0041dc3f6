// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

use adapter_wire::DEFAULT_MAX_FRAME_BYTES;

/// Hard cap on a single frame's payload size (`ADAPTERD_MAX_FRAME_BYTES`,
/// default 64 MiB).
pub fn max_frame_bytes() -> u32 {
    std::env::var("ADAPTERD_MAX_FRAME_BYTES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_FRAME_BYTES)
}

/// How long the dispatcher loop waits for a frame write to complete before
/// treating the connection as dead (`ADAPTERD_WRITE_TIMEOUT_MS`).
pub fn write_timeout() -> Duration {
    std::env::var("ADAPTERD_WRITE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Log level filter, forwarded to `tracing_subscriber::EnvFilter`
/// (`ADAPTERD_LOG`, default `info`).
pub fn log_filter() -> String {
    std::env::var("ADAPTERD_LOG").unwrap_or_else(|_| "info".to_string())
}
