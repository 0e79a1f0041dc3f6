// SPDX-License-Identifier: MIT

//! Response envelope and the response variant oneof.

use std::collections::HashMap;

use adapter_core::breakpoint::{Breakpoint, Watchpoint};
use adapter_core::error::{AdapterError, ErrorKind};
use adapter_core::thread::{StackFrame, Thread};
use adapter_core::value::{ChildrenPage, DataEncoding, Value};
use serde::{Deserialize, Serialize};

/// A framed response: the correlation hash copied verbatim from the request
/// that produced it, plus the response variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub hash: Vec<u8>,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl Response {
    pub fn ok(hash: Vec<u8>, body: ResponseBody) -> Self {
        Self { hash, body }
    }

    pub fn error(hash: Vec<u8>, err: &AdapterError) -> Self {
        Self {
            hash,
            body: ResponseBody::Error { error_kind: err.kind, error_message: err.message.clone() },
        }
    }
}

/// The response oneof. Every successful handler outcome maps to exactly one
/// of these; `Error` is the uniform failure shape for every handler. Variant
/// numbering is append-only, matching [`crate::RequestBody`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseBody {
    /// Generic success acknowledgement for handlers with no payload to return.
    Ok,
    Error {
        error_kind: ErrorKind,
        error_message: String,
    },

    TargetCreated,
    Attached,
    Detached,
    Killed,

    Continued,
    Suspended,
    Stepped,
    Jumped,

    BreakpointAdded {
        breakpoint: Breakpoint,
    },
    BreakpointRemoved,
    BreakpointUpdated {
        breakpoint: Breakpoint,
    },
    WatchpointAdded {
        watchpoint: Watchpoint,
    },
    WatchpointRemoved,
    WatchpointUpdated {
        watchpoint: Watchpoint,
    },

    Threads {
        threads: Vec<Thread>,
    },
    Frames {
        frames: Vec<StackFrame>,
    },

    Variables {
        values: Vec<Value>,
    },
    Children {
        page: ChildrenPage,
    },
    ValueData {
        bytes: Vec<u8>,
        encoding: DataEncoding,
    },
    ValueDescription {
        summary: String,
    },
    ValueAddress {
        address: Option<u64>,
    },
    ChildrenCount {
        count: i64,
    },
    ArraySlice {
        values: Vec<Value>,
    },
    FilteringPolicySet,
    Evaluated {
        value: Value,
    },

    Memory {
        bytes: Vec<u8>,
    },
    MemoryWritten {
        bytes_written: u64,
    },
    Disassembly {
        lines: Vec<String>,
    },
    Sections {
        sections: Vec<String>,
    },
    ContextInfo {
        summary: String,
    },

    Registers {
        values: HashMap<String, u64>,
    },
    RegisterSets {
        sets: Vec<String>,
    },
    Architecture {
        triple: String,
    },

    ConsoleOutput {
        text: String,
    },
    Completions {
        items: Vec<String>,
    },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
