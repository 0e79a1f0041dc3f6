// SPDX-License-Identifier: MIT

//! Session state machine.
//!
//! A single, process-wide state machine per connection. Transitions are
//! driven either by requests (`CreateTarget`, `Launch`, `Continue`, ...) or
//! by engine events (stop, exit). Precondition checks used by request
//! handlers live here as `require_*` methods so every handler enforces the
//! same rules against the same source of truth.

use parking_lot::Mutex;
use std::collections::HashSet;

use crate::error::AdapterError;
use crate::registry::EngineHandle;

/// Process lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    TargetCreated,
    Launching,
    Attaching,
    Stopped,
    Running,
    Exited,
}

crate::simple_display! {
    State {
        Uninitialized => "UNINITIALIZED",
        TargetCreated => "TARGET_CREATED",
        Launching => "LAUNCHING",
        Attaching => "ATTACHING",
        Stopped => "STOPPED",
        Running => "RUNNING",
        Exited => "EXITED",
    }
}

struct Inner {
    state: State,
    current_target: Option<EngineHandle>,
    current_process: Option<EngineHandle>,
    stop_generation: u64,
    pending_requests: HashSet<Vec<u8>>,
    initialized_emitted: bool,
}

/// The session-wide singleton. Guarded by a single short-held mutex; never
/// held across an engine call or frame write.
pub struct SessionState {
    inner: Mutex<Inner>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: State::Uninitialized,
                current_target: None,
                current_process: None,
                stop_generation: 0,
                pending_requests: HashSet::new(),
                initialized_emitted: false,
            }),
        }
    }

    pub fn state(&self) -> State {
        self.inner.lock().state
    }

    pub fn stop_generation(&self) -> u64 {
        self.inner.lock().stop_generation
    }

    pub fn current_target(&self) -> Option<EngineHandle> {
        self.inner.lock().current_target
    }

    pub fn current_process(&self) -> Option<EngineHandle> {
        self.inner.lock().current_process
    }

    // --- precondition checks used by request handlers ---
    //
    // Each returns the handle it validated instead of `()`, so callers never
    // need a follow-up `current_target()`/`current_process()` unwrap.

    pub fn require_target(&self) -> Result<EngineHandle, AdapterError> {
        self.inner.lock().current_target.ok_or_else(AdapterError::no_target)
    }

    pub fn require_process(&self) -> Result<EngineHandle, AdapterError> {
        self.inner.lock().current_process.ok_or_else(AdapterError::no_process)
    }

    pub fn require_stopped(&self) -> Result<EngineHandle, AdapterError> {
        let inner = self.inner.lock();
        match inner.state {
            State::Stopped => inner.current_process.ok_or_else(AdapterError::no_process),
            State::Running => Err(AdapterError::not_stopped()),
            _ => Err(AdapterError::no_process()),
        }
    }

    // --- state transitions ---

    /// `CreateTarget`: UNINITIALIZED|any → TARGET_CREATED. Drops any prior
    /// target/process (the breakpoint manager is responsible for emitting
    /// `REMOVED` for each breakpoint the old target owned before this call).
    pub fn create_target(&self, handle: EngineHandle) {
        let mut inner = self.inner.lock();
        inner.state = State::TargetCreated;
        inner.current_target = Some(handle);
        inner.current_process = None;
    }

    /// `Launch`: TARGET_CREATED|EXITED → LAUNCHING. Returns the target being
    /// launched.
    pub fn begin_launch(&self) -> Result<EngineHandle, AdapterError> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::TargetCreated | State::Exited => {
                let target = inner.current_target.ok_or_else(AdapterError::no_target)?;
                inner.state = State::Launching;
                Ok(target)
            }
            State::Uninitialized => Err(AdapterError::no_target()),
            _ => Err(AdapterError::already_launched()),
        }
    }

    /// Engine reports the launched process stopped at entry or is running.
    pub fn launch_settled(&self, handle: EngineHandle, stopped: bool) {
        let mut inner = self.inner.lock();
        inner.current_process = Some(handle);
        inner.state = if stopped { State::Stopped } else { State::Running };
    }

    /// `Attach`/`AttachByName`: TARGET_CREATED → STOPPED.
    pub fn attach(&self, handle: EngineHandle) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::TargetCreated => {
                inner.state = State::Attaching;
                inner.current_process = Some(handle);
                inner.state = State::Stopped;
                Ok(())
            }
            State::Uninitialized => Err(AdapterError::no_target()),
            _ => Err(AdapterError::already_launched()),
        }
    }

    /// `Continue`/`Step*`: STOPPED → RUNNING, bumping the stop-generation.
    /// Returns the new generation on success.
    pub fn resume(&self) -> Result<u64, AdapterError> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::Stopped => {
                inner.state = State::Running;
                inner.stop_generation += 1;
                Ok(inner.stop_generation)
            }
            State::Running => Err(AdapterError::not_stopped()),
            _ => Err(AdapterError::no_process()),
        }
    }

    /// Engine reports the process stopped (breakpoint, signal, step, ...).
    pub fn engine_stopped(&self) {
        let mut inner = self.inner.lock();
        inner.state = State::Stopped;
    }

    /// `Suspend`: RUNNING → STOPPED via engine interrupt. Does not bump the
    /// stop-generation — only a resume does.
    pub fn suspend(&self) -> Result<(), AdapterError> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::Running => {
                inner.state = State::Stopped;
                Ok(())
            }
            State::Stopped => Ok(()),
            _ => Err(AdapterError::no_process()),
        }
    }

    /// Engine reports the process exited, or `Kill` was requested.
    pub fn process_exited(&self) {
        let mut inner = self.inner.lock();
        inner.state = State::Exited;
        inner.current_process = None;
    }

    /// Records that a correlation hash is in flight. The dispatcher inserts
    /// on request parse and removes immediately before sending the response,
    /// so this set is never observed empty _between_ the two.
    pub fn begin_request(&self, hash: Vec<u8>) {
        self.inner.lock().pending_requests.insert(hash);
    }

    pub fn end_request(&self, hash: &[u8]) {
        self.inner.lock().pending_requests.remove(hash);
    }

    pub fn pending_request_count(&self) -> usize {
        self.inner.lock().pending_requests.len()
    }

    /// `Initialized` is emitted exactly once per connection. Returns `true`
    /// the first time it's called.
    pub fn mark_initialized_once(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.initialized_emitted {
            false
        } else {
            inner.initialized_emitted = true;
            true
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
