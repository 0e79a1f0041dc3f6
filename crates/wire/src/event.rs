// SPDX-License-Identifier: MIT

//! Unsolicited protocol events emitted by the Event Pump.
//!
//! Events carry no correlation hash — they are not responses to a specific
//! request.

use adapter_core::breakpoint::{Breakpoint, Location, Watchpoint};
use adapter_core::id::{BreakpointId, ModuleId, ThreadId, WatchpointId};
use adapter_core::thread::StopInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Emitted exactly once per connection.
    Initialized,
    ProcessRunning {
        stop_generation: u64,
    },
    Stopped {
        thread_id: ThreadId,
        reason: StopInfo,
        stop_generation: u64,
    },
    ProcessExited {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
    },

    BreakpointAdded {
        breakpoint: Breakpoint,
    },
    BreakpointChanged {
        breakpoint: Breakpoint,
    },
    BreakpointRemoved {
        id: BreakpointId,
    },
    BreakpointLocationsResolved {
        breakpoint_id: BreakpointId,
        locations: Vec<Location>,
    },

    WatchpointAdded {
        watchpoint: Watchpoint,
    },
    WatchpointChanged {
        watchpoint: Watchpoint,
    },
    WatchpointRemoved {
        id: WatchpointId,
    },

    ModuleLoaded {
        module_id: ModuleId,
        path: String,
    },
    ModuleUnloaded {
        module_id: ModuleId,
    },

    StdOut {
        bytes: Vec<u8>,
    },
    StdErr {
        bytes: Vec<u8>,
    },

    ThreadStarted {
        thread_id: ThreadId,
    },
    ThreadExited {
        thread_id: ThreadId,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
