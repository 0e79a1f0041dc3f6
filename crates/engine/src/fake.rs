// SPDX-License-Identifier: MIT

//! In-memory reference engine.
//!
//! Used by the daemon when no real engine library is configured, and by
//! tests that need a deterministic, fast stand-in for the real LLDB-compatible
//! binding (out of scope per this crate's boundary). Mirrors canned-response
//! in-memory test doubles the way the broader example pack builds them for
//! external-system adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use adapter_core::breakpoint::BreakpointSpec;
use adapter_core::registry::EngineHandle;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::facade::Engine;
use crate::types::{
    BreakpointResolution, DataEncoding, EngineEvent, FrameInfo, LaunchSpec, ModuleInfo,
    ResolvedLocation, StepKind, ThreadInfo, ValueData, ValueInfo, ValueKindFilter,
};

struct Inner {
    next_handle: u64,
    targets: HashMap<u64, Vec<ModuleInfo>>,
    breakpoints: HashMap<u64, bool>,
    watchpoints: HashMap<u64, bool>,
}

impl Inner {
    fn alloc(&mut self) -> EngineHandle {
        self.next_handle += 1;
        EngineHandle(self.next_handle)
    }
}

/// A canned, deterministic `Engine` implementation with no real debugging
/// behavior. Every operation either succeeds with fixed data or is recorded
/// for assertions in tests.
pub struct NullEngine {
    inner: Mutex<Inner>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: Mutex<Option<mpsc::Receiver<EngineEvent>>>,
    synthetic_address: AtomicU64,
}

impl NullEngine {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            inner: Mutex::new(Inner {
                next_handle: 0,
                targets: HashMap::new(),
                breakpoints: HashMap::new(),
                watchpoints: HashMap::new(),
            }),
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            synthetic_address: AtomicU64::new(0x401000),
        }
    }

    /// Push a fake engine notification, as a real engine's event thread
    /// would. Used by the daemon's own tests to drive the Event Pump.
    pub async fn inject_event(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event).await;
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for NullEngine {
    async fn create_target(&self, _file_path: &str) -> Result<EngineHandle, EngineError> {
        let mut inner = self.inner.lock();
        let handle = inner.alloc();
        inner.targets.insert(handle.0, Vec::new());
        Ok(handle)
    }

    async fn delete_target(&self, target: EngineHandle) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.targets.remove(&target.0).ok_or(EngineError::InvalidHandle).map(|_| ())
    }

    async fn list_modules(&self, target: EngineHandle) -> Result<Vec<ModuleInfo>, EngineError> {
        let inner = self.inner.lock();
        inner.targets.get(&target.0).cloned().ok_or(EngineError::InvalidHandle)
    }

    async fn find_function_by_name(
        &self,
        target: EngineHandle,
        _name: &str,
    ) -> Result<Option<u64>, EngineError> {
        let inner = self.inner.lock();
        if inner.targets.contains_key(&target.0) {
            Ok(None)
        } else {
            Err(EngineError::InvalidHandle)
        }
    }

    async fn launch(&self, target: EngineHandle, _spec: LaunchSpec) -> Result<EngineHandle, EngineError> {
        let mut inner = self.inner.lock();
        if !inner.targets.contains_key(&target.0) {
            return Err(EngineError::InvalidHandle);
        }
        Ok(inner.alloc())
    }

    async fn attach_by_pid(&self, target: EngineHandle, _pid: u64) -> Result<EngineHandle, EngineError> {
        let mut inner = self.inner.lock();
        if !inner.targets.contains_key(&target.0) {
            return Err(EngineError::InvalidHandle);
        }
        Ok(inner.alloc())
    }

    async fn attach_by_name(
        &self,
        target: EngineHandle,
        _name: &str,
        _wait_for: bool,
    ) -> Result<EngineHandle, EngineError> {
        let mut inner = self.inner.lock();
        if !inner.targets.contains_key(&target.0) {
            return Err(EngineError::InvalidHandle);
        }
        Ok(inner.alloc())
    }

    async fn detach(&self, _process: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }

    async fn kill(&self, _process: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }

    async fn suspend(&self, _process: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }

    async fn resume(&self, _process: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }

    async fn step(&self, _process: EngineHandle, _thread: EngineHandle, _kind: StepKind) -> Result<(), EngineError> {
        Ok(())
    }

    async fn jump_to_line(&self, _thread: EngineHandle, _file_path: &str, _line: u32) -> Result<(), EngineError> {
        Ok(())
    }

    async fn jump_to_address(&self, _thread: EngineHandle, _address: u64) -> Result<(), EngineError> {
        Ok(())
    }

    async fn read_memory(&self, _process: EngineHandle, _address: u64, length: u64) -> Result<Vec<u8>, EngineError> {
        Ok(vec![0u8; length as usize])
    }

    async fn write_memory(&self, _process: EngineHandle, _address: u64, bytes: &[u8]) -> Result<u64, EngineError> {
        Ok(bytes.len() as u64)
    }

    async fn read_registers(
        &self,
        _thread: EngineHandle,
        _group_names: Option<&[String]>,
        _register_names: Option<&[String]>,
    ) -> Result<Vec<(String, u64)>, EngineError> {
        Ok(vec![("pc".to_string(), 0x401000), ("sp".to_string(), 0x7fff0000)])
    }

    async fn write_register(&self, _thread: EngineHandle, _name: &str, _value: u64) -> Result<(), EngineError> {
        Ok(())
    }

    async fn disassemble(
        &self,
        _process: EngineHandle,
        address: u64,
        _byte_count: Option<u64>,
        _instruction_count: Option<u64>,
    ) -> Result<Vec<String>, EngineError> {
        Ok(vec![format!("0x{address:x}: nop")])
    }

    async fn create_breakpoint(
        &self,
        target: EngineHandle,
        spec: &BreakpointSpec,
    ) -> Result<BreakpointResolution, EngineError> {
        let mut inner = self.inner.lock();
        if !inner.targets.contains_key(&target.0) {
            return Err(EngineError::InvalidHandle);
        }
        let handle = inner.alloc();
        inner.breakpoints.insert(handle.0, true);
        drop(inner);

        let locations = match spec {
            BreakpointSpec::Address { addr } => {
                vec![ResolvedLocation { handle: self.next_synthetic(), address: *addr, file_path: None, line: None }]
            }
            BreakpointSpec::Function { .. } => {
                let address = self.synthetic_address.fetch_add(0x10, Ordering::Relaxed);
                vec![ResolvedLocation { handle: self.next_synthetic(), address, file_path: None, line: None }]
            }
            // Line/symbol breakpoints in a module that hasn't been "loaded" stay
            // unresolved — not an error.
            BreakpointSpec::Line { .. } | BreakpointSpec::Symbol { .. } => Vec::new(),
        };
        Ok(BreakpointResolution { handle, locations })
    }

    async fn set_breakpoint_condition(&self, breakpoint: EngineHandle, _condition: Option<&str>) -> Result<(), EngineError> {
        self.require_breakpoint(breakpoint)
    }

    async fn set_breakpoint_ignore_count(&self, breakpoint: EngineHandle, _count: u32) -> Result<(), EngineError> {
        self.require_breakpoint(breakpoint)
    }

    async fn set_breakpoint_thread_restriction(
        &self,
        breakpoint: EngineHandle,
        _thread_id: Option<u64>,
    ) -> Result<(), EngineError> {
        self.require_breakpoint(breakpoint)
    }

    async fn set_breakpoint_enabled(&self, breakpoint: EngineHandle, enabled: bool) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        match inner.breakpoints.get_mut(&breakpoint.0) {
            Some(slot) => {
                *slot = enabled;
                Ok(())
            }
            None => Err(EngineError::InvalidHandle),
        }
    }

    async fn delete_breakpoint(&self, breakpoint: EngineHandle) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.breakpoints.remove(&breakpoint.0).ok_or(EngineError::InvalidHandle).map(|_| ())
    }

    async fn create_watchpoint(
        &self,
        target: EngineHandle,
        _address: u64,
        size_bytes: u32,
        _read: bool,
        _write: bool,
    ) -> Result<EngineHandle, EngineError> {
        if size_bytes == 0 {
            return Err(EngineError::Rejected("zero-size watchpoint".to_string()));
        }
        let mut inner = self.inner.lock();
        if !inner.targets.contains_key(&target.0) {
            return Err(EngineError::InvalidHandle);
        }
        let handle = inner.alloc();
        inner.watchpoints.insert(handle.0, true);
        Ok(handle)
    }

    async fn set_watchpoint_enabled(&self, watchpoint: EngineHandle, enabled: bool) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        match inner.watchpoints.get_mut(&watchpoint.0) {
            Some(slot) => {
                *slot = enabled;
                Ok(())
            }
            None => Err(EngineError::InvalidHandle),
        }
    }

    async fn delete_watchpoint(&self, watchpoint: EngineHandle) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.watchpoints.remove(&watchpoint.0).ok_or(EngineError::InvalidHandle).map(|_| ())
    }

    async fn list_threads(&self, _process: EngineHandle) -> Result<Vec<ThreadInfo>, EngineError> {
        Ok(vec![ThreadInfo { handle: self.next_synthetic(), native_tid: 1, name: "main".to_string() }])
    }

    async fn get_frames(&self, _thread: EngineHandle, _start: u32, _count: u32) -> Result<Vec<FrameInfo>, EngineError> {
        Ok(vec![FrameInfo {
            handle: self.next_synthetic(),
            function_name: "main".to_string(),
            file_path: None,
            line: None,
            program_counter: 0x401000,
        }])
    }

    async fn list_values(&self, _frame: EngineHandle, _kinds: &[ValueKindFilter]) -> Result<Vec<ValueInfo>, EngineError> {
        Ok(Vec::new())
    }

    async fn value_children(&self, _value: EngineHandle, _offset: usize, _count: usize) -> Result<Vec<ValueInfo>, EngineError> {
        Ok(Vec::new())
    }

    async fn value_data(&self, _value: EngineHandle) -> Result<ValueData, EngineError> {
        Ok(ValueData { bytes: Vec::new(), encoding: DataEncoding::Bytes })
    }

    async fn value_description(&self, _value: EngineHandle) -> Result<String, EngineError> {
        Ok(String::new())
    }

    async fn evaluate(&self, _frame: EngineHandle, expression: &str) -> Result<ValueInfo, EngineError> {
        Ok(ValueInfo {
            handle: self.next_synthetic(),
            name: expression.to_string(),
            type_name: "int".to_string(),
            summary: "0".to_string(),
            raw_value: "0".to_string(),
            children_count: Some(0),
            address: None,
        })
    }

    // Allow expect here: the Event Pump calls subscribe() exactly once per
    // connection, and a second call is a caller bug worth crashing on.
    #[allow(clippy::expect_used)]
    fn subscribe(&self) -> mpsc::Receiver<EngineEvent> {
        self.event_rx.lock().take().expect("NullEngine::subscribe called more than once")
    }
}

impl NullEngine {
    fn next_synthetic(&self) -> EngineHandle {
        self.inner.lock().alloc()
    }

    fn require_breakpoint(&self, breakpoint: EngineHandle) -> Result<(), EngineError> {
        if self.inner.lock().breakpoints.contains_key(&breakpoint.0) {
            Ok(())
        } else {
            Err(EngineError::InvalidHandle)
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
