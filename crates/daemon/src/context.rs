// SPDX-License-Identifier: MIT

//! Per-connection shared state.
//!
//! One [`SessionContext`] lives for the lifetime of the single accepted
//! connection this daemon serves at a time. It bundles the ID registry, the
//! session state machine, the engine handle, breakpoint/watchpoint
//! bookkeeping, and the outbound write mutex shared between the dispatcher
//! and the Event Pump.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use adapter_core::breakpoint::{Breakpoint, Watchpoint};
use adapter_core::id::{BreakpointId, FrameId, ThreadId, ValueId, WatchpointId};
use adapter_core::thread::{StackFrame, Thread};
use adapter_core::value::{FilterPolicy, Value};
use adapter_core::{Registry, SessionState};
use adapter_engine::Engine;
use adapter_wire::ProtocolError;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::io::AsyncWrite;

/// State shared between the Request Dispatcher and the Event Pump for one
/// connection.
pub struct SessionContext<W> {
    pub registry: Registry,
    pub session: SessionState,
    pub engine: Arc<dyn Engine>,
    pub breakpoints: Mutex<HashMap<BreakpointId, Breakpoint>>,
    pub watchpoints: Mutex<HashMap<WatchpointId, Watchpoint>>,
    pub filter_policy: Mutex<FilterPolicy>,
    /// Last known snapshot of every value the dispatcher has handed out an ID
    /// for in the current stop-generation. Lets `ValueAddress` and
    /// `ChildrenCount` answer from memory instead of a fresh engine call.
    pub values: Mutex<HashMap<ValueId, Value>>,
    /// Threads observed at the current stop — ephemeral, cleared on resume.
    pub threads: Mutex<HashMap<ThreadId, Thread>>,
    /// Stack frames handed out since the current stop — ephemeral, cleared
    /// on resume.
    pub frames: Mutex<HashMap<FrameId, StackFrame>>,
    /// Threads the frontend asked to exclude from stepping/resume
    /// (`FreezeThread`/`UnfreezeThread`). Not modeled by the Engine facade —
    /// purely protocol-level bookkeeping.
    pub frozen_threads: Mutex<HashSet<ThreadId>>,
    max_frame_bytes: u32,
    writer: tokio::sync::Mutex<W>,
}

impl<W> SessionContext<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(engine: Arc<dyn Engine>, writer: W, max_frame_bytes: u32) -> Self {
        Self {
            registry: Registry::new(),
            session: SessionState::new(),
            engine,
            breakpoints: Mutex::new(HashMap::new()),
            watchpoints: Mutex::new(HashMap::new()),
            filter_policy: Mutex::new(FilterPolicy::default()),
            values: Mutex::new(HashMap::new()),
            threads: Mutex::new(HashMap::new()),
            frames: Mutex::new(HashMap::new()),
            frozen_threads: Mutex::new(HashSet::new()),
            max_frame_bytes,
            writer: tokio::sync::Mutex::new(writer),
        }
    }

    pub fn max_frame_bytes(&self) -> u32 {
        self.max_frame_bytes
    }

    /// Advance the stop-generation, purging every ephemeral ID table before
    /// the event announcing it is sent, so a frontend can never observe an
    /// ID from a generation it hasn't been told about yet. Returns the new
    /// generation, which callers stamp onto the `ProcessRunning`/`Stopped`
    /// events they emit.
    pub fn bump_generation(&self) -> u64 {
        let generation = self.registry.bump_stop_generation();
        self.threads.lock().clear();
        self.frames.lock().clear();
        self.values.lock().clear();
        self.frozen_threads.lock().clear();
        generation
    }

    /// Serialize `payload` and write it as a single frame under the write
    /// mutex, held only for the duration of the serialization and write —
    /// never across an engine call.
    pub async fn send_frame<T: Serialize>(&self, payload: &T) -> Result<(), ProtocolError> {
        let bytes = adapter_wire::encode(payload)?;
        let mut writer = self.writer.lock().await;
        adapter_wire::write_message(&mut *writer, &bytes).await
    }
}
