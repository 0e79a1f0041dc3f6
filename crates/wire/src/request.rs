// SPDX-License-Identifier: MIT

//! Request envelope and the request variant oneof.

use std::collections::HashMap;

use adapter_core::breakpoint::BreakpointSpec;
use adapter_core::id::{BreakpointId, FrameId, ThreadId, ValueId, WatchpointId};
use adapter_core::value::{FilterPolicy, KindMask};
use serde::{Deserialize, Serialize};

/// A framed request: an opaque correlation hash plus the request variant.
/// The adapter echoes `hash` verbatim on the matching [`crate::Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub hash: Vec<u8>,
    #[serde(flatten)]
    pub body: RequestBody,
}

impl Request {
    /// Decode a frame payload, recovering the correlation hash even when the
    /// `type` tag doesn't match a known [`RequestBody`] variant — an unknown
    /// request still gets a proper error response carrying its hash rather
    /// than being dropped silently. `serde`'s internally-tagged enum rejects
    /// the whole struct on an unrecognized tag, so on failure this falls
    /// back to pulling `hash` out of the raw JSON directly; if even that
    /// fails the hash is empty (the frame isn't JSON at all, or has no
    /// `hash` field).
    pub fn decode_lenient(bytes: &[u8]) -> Result<Request, Vec<u8>> {
        match crate::decode::<Request>(bytes) {
            Ok(req) => Ok(req),
            Err(_) => Err(serde_json::from_slice::<serde_json::Value>(bytes)
                .ok()
                .and_then(|v| v.get("hash").cloned())
                .and_then(|v| serde_json::from_value::<Vec<u8>>(v).ok())
                .unwrap_or_default()),
        }
    }
}

/// The request oneof. Variant numbering is append-only — never reorder or
/// remove a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    // --- target & process ---
    CreateTarget {
        file_path: String,
    },
    Attach {
        pid: u64,
    },
    AttachByName {
        name: String,
        wait_for: bool,
    },
    LoadCore {
        core_path: String,
    },
    Launch {
        argv: Vec<String>,
        #[serde(default)]
        env: HashMap<String, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stdin_path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stdout_path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stderr_path: Option<String>,
        #[serde(default)]
        stop_at_entry: bool,
    },
    Detach,
    Kill,
    Exit,
    ConnectPlatform {
        url: String,
    },
    ConnectProcess {
        pid: u64,
    },

    // --- execution ---
    Continue,
    Suspend,
    StepIn {
        #[serde(default)]
        step_by_instruction: bool,
    },
    StepOver {
        #[serde(default)]
        step_by_instruction: bool,
    },
    StepOut,
    StepScripted {
        class_name: String,
    },
    JumpToLine {
        file_path: String,
        line: u32,
    },
    JumpToAddress {
        address: u64,
    },

    // --- breakpoints ---
    AddBreakpoint {
        spec: BreakpointSpec,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        #[serde(default)]
        ignore_count: u32,
    },
    RemoveBreakpoint {
        id: BreakpointId,
    },
    AddWatchpoint {
        address: u64,
        size_bytes: u32,
        read: bool,
        write: bool,
    },
    RemoveWatchpoint {
        id: WatchpointId,
    },
    SetBreakpointCondition {
        id: BreakpointId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
    SetBreakpointIgnoreCount {
        id: BreakpointId,
        ignore_count: u32,
    },
    SetBreakpointEnabled {
        id: BreakpointId,
        enabled: bool,
    },
    SetBreakpointThreadRestriction {
        id: BreakpointId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_id: Option<u64>,
    },
    SetWatchpointEnabled {
        id: WatchpointId,
        enabled: bool,
    },

    // --- threads/frames ---
    GetThreads,
    GetFrames {
        thread_id: ThreadId,
        #[serde(default)]
        start: u32,
        #[serde(default)]
        count: u32,
    },
    FreezeThread {
        thread_id: ThreadId,
    },
    UnfreezeThread {
        thread_id: ThreadId,
    },

    // --- values ---
    Variables {
        frame_id: FrameId,
        kind_mask: KindMask,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter_policy: Option<FilterPolicy>,
    },
    ValueChildren {
        value_id: ValueId,
        offset: usize,
        count: usize,
        #[serde(default = "default_max_depth")]
        max_depth: u32,
        max_children: usize,
    },
    ValueData {
        value_id: ValueId,
    },
    ValueDescription {
        value_id: ValueId,
    },
    ValueAddress {
        value_id: ValueId,
    },
    ChildrenCount {
        value_id: ValueId,
    },
    ArraySlice {
        value_id: ValueId,
        offset: usize,
        count: usize,
    },
    SetValueFilteringPolicy {
        policy: FilterPolicy,
    },
    Evaluate {
        frame_id: FrameId,
        expression: String,
    },

    // --- memory/disassembly ---
    DumpMemory {
        address: u64,
        length: u64,
    },
    WriteMemory {
        address: u64,
        bytes: Vec<u8>,
    },
    Disassemble {
        address: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        byte_count: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instruction_count: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_id: Option<ThreadId>,
    },
    DumpSections,
    GetContextInfo,

    // --- registers ---
    GetRegisters {
        thread_id: ThreadId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_names: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        register_names: Option<Vec<String>>,
    },
    GetRegisterSets {
        thread_id: ThreadId,
    },
    GetArchitecture,

    // --- console/commands ---
    HandleConsoleCommand {
        command: String,
    },
    HandleCompletion {
        text: String,
        cursor_pos: u32,
    },
    DispatchInput {
        bytes: Vec<u8>,
    },
    ResizeConsole {
        cols: u32,
        rows: u32,
    },

    // --- signals/symbols/shell ---
    HandleSignal {
        signo: i32,
        pass: bool,
        stop: bool,
        notify: bool,
    },
    ExecuteShellCommand {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    CancelSymbolsDownload,
}

fn default_max_depth() -> u32 {
    1
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
