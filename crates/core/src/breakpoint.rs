// SPDX-License-Identifier: MIT

//! Protocol-level breakpoint/watchpoint model.

use serde::{Deserialize, Serialize};

use crate::id::{BreakpointId, LocationId, WatchpointId};

/// Which hash algorithm a frontend used to fingerprint a source file.
///
/// Defined by the schema but unused by resolution logic — kept as a no-op
/// field until a frontend actually negotiates its use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

/// A source file fingerprint, carried but never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHash {
    pub algorithm: HashAlgorithm,
    pub digest: String,
}

/// A resolved (or not-yet-resolved) source position.
///
/// `column` is carried even though no frontend populates it yet — the
/// engine reports it, and adding the field is backward compatible with
/// clients that don't send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Kind-specific breakpoint creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BreakpointSpec {
    Line {
        file_path: String,
        line: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_hash: Option<SourceHash>,
    },
    Address {
        addr: u64,
    },
    Function {
        name: String,
        #[serde(default)]
        mangled: bool,
    },
    Symbol {
        pattern: String,
        is_regex: bool,
    },
}

impl BreakpointSpec {
    pub fn validate(&self) -> Result<(), crate::error::AdapterError> {
        use crate::error::AdapterError;
        match self {
            BreakpointSpec::Line { file_path, .. } if file_path.is_empty() => {
                Err(AdapterError::invalid_argument("line breakpoint requires a non-empty file path"))
            }
            BreakpointSpec::Function { name, .. } if name.is_empty() => {
                Err(AdapterError::invalid_argument("function breakpoint requires a non-empty name"))
            }
            BreakpointSpec::Symbol { pattern, .. } if pattern.is_empty() => {
                Err(AdapterError::invalid_argument("symbol breakpoint requires a non-empty pattern"))
            }
            _ => Ok(()),
        }
    }
}

/// A resolved physical location for a breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: LocationId,
    pub address: u64,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

/// A protocol-level breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub spec: BreakpointSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub ignore_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_restriction: Option<u64>,
    pub enabled: bool,
    pub locations: Vec<Location>,
    #[serde(default)]
    pub hit_count: u32,
}

impl Breakpoint {
    pub fn new(id: BreakpointId, spec: BreakpointSpec) -> Self {
        Self {
            id,
            spec,
            condition: None,
            ignore_count: 0,
            thread_restriction: None,
            enabled: true,
            locations: Vec::new(),
            hit_count: 0,
        }
    }

    /// A breakpoint is resolved when it has at least one resolved location.
    pub fn resolved(&self) -> bool {
        self.locations.iter().any(|l| l.resolved)
    }

    /// Reset per-process-lifetime counters on re-launch.
    pub fn reset_for_relaunch(&mut self) {
        self.hit_count = 0;
    }
}

/// Watchpoint access direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchpointAccess {
    pub read: bool,
    pub write: bool,
}

/// A protocol-level watchpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchpoint {
    pub id: WatchpointId,
    pub address: u64,
    pub size_bytes: u32,
    pub access: WatchpointAccess,
    pub enabled: bool,
    pub hit_count: u32,
}

impl Watchpoint {
    pub fn validate_size(size_bytes: u32) -> Result<(), crate::error::AdapterError> {
        if size_bytes == 0 {
            Err(crate::error::AdapterError::invalid_argument("watchpoint size must be non-zero"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "breakpoint_tests.rs"]
mod tests;
