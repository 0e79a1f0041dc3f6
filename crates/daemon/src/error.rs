// SPDX-License-Identifier: MIT

//! Translation of registry/engine failures into the wire-facing error
//! taxonomy.

use adapter_core::error::AdapterError;
use adapter_core::registry::LookupError;
use adapter_engine::EngineError;

pub fn lookup_err(what: &str, e: LookupError) -> AdapterError {
    match e {
        LookupError::NotFound => AdapterError::not_found(what),
        LookupError::Stale => AdapterError::stale_handle(),
    }
}

pub fn engine_err(e: EngineError) -> AdapterError {
    match e {
        EngineError::InvalidHandle => AdapterError::not_found("engine handle"),
        EngineError::Rejected(message) => AdapterError::engine_failure(message),
        EngineError::Unsupported(op) => AdapterError::engine_failure(format!("unsupported: {op}")),
    }
}

/// Fatal failures that tear down the connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("wire protocol error: {0}")]
    Protocol(#[from] adapter_wire::ProtocolError),
}
