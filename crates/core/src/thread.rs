// SPDX-License-Identifier: MIT

//! Thread/frame model.

use serde::{Deserialize, Serialize};

use crate::breakpoint::SourceLocation;
use crate::id::{BreakpointId, FrameId, LocationId, ThreadId, WatchpointId};

/// Structured stop reason. Only the variants the underlying engine reports
/// are populated; unsupported ones fall back to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum StopInfo {
    Breakpoint { bp_id: BreakpointId, loc_id: LocationId },
    Watchpoint { wp_id: WatchpointId, access_type: WatchpointAccessType },
    Signal { signo: i32, name: String },
    Exception { description: String },
    Step,
    PlanComplete,
    Exec,
    Trace,
    /// Fallback for engine-reported reasons the adapter doesn't model explicitly.
    Other { description: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchpointAccessType {
    Read,
    Write,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadRunState {
    Running,
    Stopped,
    Exited,
}

/// A thread exposed to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub native_tid: u64,
    pub name: String,
    pub state: ThreadRunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_info: Option<StopInfo>,
}

/// A stack frame, retrieved on demand for a thread within the current
/// stop-generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub id: FrameId,
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
    pub program_counter: u64,
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
