// SPDX-License-Identifier: MIT

//! Errors surfaced by the [`crate::Engine`] facade.

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    /// A handle the caller passed in doesn't (or no longer) refers to a live
    /// engine object. The facade MUST surface this rather than crash.
    #[error("invalid engine handle")]
    InvalidHandle,
    /// The engine itself rejected the operation; carries its diagnostic string.
    #[error("engine rejected operation: {0}")]
    Rejected(String),
    /// The operation isn't implemented by this engine binding.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
