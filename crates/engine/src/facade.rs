// SPDX-License-Identifier: MIT

//! The capability interface the dispatcher requires from an LLDB-compatible
//! debugging engine. No concrete engine binding lives here — only the trait
//! boundary and an in-memory double for tests.

use adapter_core::breakpoint::BreakpointSpec;
use adapter_core::registry::EngineHandle;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::types::{
    BreakpointResolution, EngineEvent, FrameInfo, LaunchSpec, ModuleInfo, StepKind, ThreadInfo,
    ValueData, ValueInfo, ValueKindFilter,
};

/// Capability set required of any LLDB-compatible engine binding.
///
/// Every method takes handles by value and returns `Result`; the facade MUST
/// validate handles before use and surface [`EngineError::InvalidHandle`]
/// rather than panic.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    // --- target ---
    async fn create_target(&self, file_path: &str) -> Result<EngineHandle, EngineError>;
    async fn delete_target(&self, target: EngineHandle) -> Result<(), EngineError>;
    async fn list_modules(&self, target: EngineHandle) -> Result<Vec<ModuleInfo>, EngineError>;
    async fn find_function_by_name(
        &self,
        target: EngineHandle,
        name: &str,
    ) -> Result<Option<u64>, EngineError>;

    // --- process ---
    async fn launch(&self, target: EngineHandle, spec: LaunchSpec) -> Result<EngineHandle, EngineError>;
    async fn attach_by_pid(&self, target: EngineHandle, pid: u64) -> Result<EngineHandle, EngineError>;
    async fn attach_by_name(
        &self,
        target: EngineHandle,
        name: &str,
        wait_for: bool,
    ) -> Result<EngineHandle, EngineError>;
    async fn detach(&self, process: EngineHandle) -> Result<(), EngineError>;
    async fn kill(&self, process: EngineHandle) -> Result<(), EngineError>;
    async fn suspend(&self, process: EngineHandle) -> Result<(), EngineError>;
    async fn resume(&self, process: EngineHandle) -> Result<(), EngineError>;
    async fn step(&self, process: EngineHandle, thread: EngineHandle, kind: StepKind) -> Result<(), EngineError>;
    async fn jump_to_line(&self, thread: EngineHandle, file_path: &str, line: u32) -> Result<(), EngineError>;
    async fn jump_to_address(&self, thread: EngineHandle, address: u64) -> Result<(), EngineError>;
    async fn read_memory(&self, process: EngineHandle, address: u64, length: u64) -> Result<Vec<u8>, EngineError>;
    async fn write_memory(&self, process: EngineHandle, address: u64, bytes: &[u8]) -> Result<u64, EngineError>;
    async fn read_registers(
        &self,
        thread: EngineHandle,
        group_names: Option<&[String]>,
        register_names: Option<&[String]>,
    ) -> Result<Vec<(String, u64)>, EngineError>;
    async fn write_register(&self, thread: EngineHandle, name: &str, value: u64) -> Result<(), EngineError>;
    async fn disassemble(
        &self,
        process: EngineHandle,
        address: u64,
        byte_count: Option<u64>,
        instruction_count: Option<u64>,
    ) -> Result<Vec<String>, EngineError>;

    // --- breakpoints ---
    async fn create_breakpoint(
        &self,
        target: EngineHandle,
        spec: &BreakpointSpec,
    ) -> Result<BreakpointResolution, EngineError>;
    async fn set_breakpoint_condition(
        &self,
        breakpoint: EngineHandle,
        condition: Option<&str>,
    ) -> Result<(), EngineError>;
    async fn set_breakpoint_ignore_count(&self, breakpoint: EngineHandle, count: u32) -> Result<(), EngineError>;
    async fn set_breakpoint_thread_restriction(
        &self,
        breakpoint: EngineHandle,
        thread_id: Option<u64>,
    ) -> Result<(), EngineError>;
    async fn set_breakpoint_enabled(&self, breakpoint: EngineHandle, enabled: bool) -> Result<(), EngineError>;
    async fn delete_breakpoint(&self, breakpoint: EngineHandle) -> Result<(), EngineError>;

    // --- watchpoints ---
    async fn create_watchpoint(
        &self,
        target: EngineHandle,
        address: u64,
        size_bytes: u32,
        read: bool,
        write: bool,
    ) -> Result<EngineHandle, EngineError>;
    async fn set_watchpoint_enabled(&self, watchpoint: EngineHandle, enabled: bool) -> Result<(), EngineError>;
    async fn delete_watchpoint(&self, watchpoint: EngineHandle) -> Result<(), EngineError>;

    // --- threads/frames ---
    async fn list_threads(&self, process: EngineHandle) -> Result<Vec<ThreadInfo>, EngineError>;
    async fn get_frames(
        &self,
        thread: EngineHandle,
        start: u32,
        count: u32,
    ) -> Result<Vec<FrameInfo>, EngineError>;

    // --- values ---
    async fn list_values(
        &self,
        frame: EngineHandle,
        kinds: &[ValueKindFilter],
    ) -> Result<Vec<ValueInfo>, EngineError>;
    async fn value_children(
        &self,
        value: EngineHandle,
        offset: usize,
        count: usize,
    ) -> Result<Vec<ValueInfo>, EngineError>;
    async fn value_data(&self, value: EngineHandle) -> Result<ValueData, EngineError>;
    async fn value_description(&self, value: EngineHandle) -> Result<String, EngineError>;
    async fn evaluate(&self, frame: EngineHandle, expression: &str) -> Result<ValueInfo, EngineError>;

    // --- event subscription ---
    /// Subscribe to engine notifications. Called once, by the Event Pump, at
    /// session start. The channel stays open for the session's lifetime; a
    /// closed channel signals engine shutdown.
    fn subscribe(&self) -> mpsc::Receiver<EngineEvent>;
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
