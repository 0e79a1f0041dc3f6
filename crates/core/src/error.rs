// SPDX-License-Identifier: MIT

//! Structured error taxonomy shared by the registry, breakpoint manager,
//! session state machine, and engine facade.
//!
//! Every handler-level failure is captured into a response's error fields;
//! it never propagates out of the dispatcher's request loop. [`ErrorKind`]
//! is the wire-facing classification; concrete modules raise their own
//! `thiserror` error types and convert into it at the dispatcher boundary.

use serde::{Deserialize, Serialize};

/// Structured error kind surfaced on `Response::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request variant not recognized by this build.
    UnknownRequest,
    /// Payload failed validation (negative line, empty path, zero-size watchpoint, ...).
    InvalidArgument,
    /// No target has been created yet.
    NoTarget,
    /// No process has been launched/attached yet.
    NoProcess,
    /// The process is running; a stop-required operation was attempted.
    NotStopped,
    /// An operation requires the process not already be running/launched.
    AlreadyLaunched,
    /// ID lookup failed (unknown breakpoint, unknown thread, ...).
    NotFound,
    /// An ephemeral ID from a prior stop-generation was used.
    StaleHandle,
    /// The engine rejected the operation; carries the engine's diagnostic string
    /// in the response's `error_message`.
    EngineFailure,
}

crate::simple_display! {
    ErrorKind {
        UnknownRequest => "UNKNOWN_REQUEST",
        InvalidArgument => "INVALID_ARGUMENT",
        NoTarget => "NO_TARGET",
        NoProcess => "NO_PROCESS",
        NotStopped => "NOT_STOPPED",
        AlreadyLaunched => "ALREADY_LAUNCHED",
        NotFound => "NOT_FOUND",
        StaleHandle => "STALE_HANDLE",
        EngineFailure => "ENGINE_FAILURE",
    }
}

/// A structured failure carrying both the wire [`ErrorKind`] and a human
/// message. Handlers return this instead of panicking or tearing down the
/// session; it is converted into `Response::Error`-shaped fields.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct AdapterError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AdapterError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn no_target() -> Self {
        Self::new(ErrorKind::NoTarget, "no target has been created")
    }

    pub fn no_process() -> Self {
        Self::new(ErrorKind::NoProcess, "no process has been launched or attached")
    }

    pub fn not_stopped() -> Self {
        Self::new(ErrorKind::NotStopped, "process is running, not stopped")
    }

    pub fn already_launched() -> Self {
        Self::new(ErrorKind::AlreadyLaunched, "a process is already launched")
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("not found: {what}"))
    }

    pub fn stale_handle() -> Self {
        Self::new(ErrorKind::StaleHandle, "id belongs to a prior stop-generation")
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn engine_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EngineFailure, message)
    }
}
