// SPDX-License-Identifier: MIT

//! Bidirectional stable-ID ↔ engine-handle registry.
//!
//! Long-lived kinds (breakpoint, watchpoint, module, location) keep their
//! mapping for the object's protocol lifetime. Ephemeral kinds (thread,
//! frame, value) are only valid within the current stop-generation: looking
//! one up after a `bump_stop_generation()` call returns [`LookupError::Stale`]
//! if it was ever assigned, or [`LookupError::NotFound`] if it never was.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::id::IdGenerator;

/// Opaque identity token for an engine-side object.
///
/// The registry never owns the engine handle itself — only an identity
/// token the engine facade (adapter-engine crate) assigns when it resolves
/// or creates an object. Keeping the registry ignorant of what a handle
/// actually points to avoids a dependency cycle between the two crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u64);

/// Category of protocol object the registry tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Breakpoint,
    Watchpoint,
    Location,
    Module,
    Thread,
    Frame,
    Value,
}

impl ObjectKind {
    fn is_ephemeral(self) -> bool {
        matches!(self, ObjectKind::Thread | ObjectKind::Frame | ObjectKind::Value)
    }
}

/// Failure modes for [`Registry::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No such ID was ever assigned for this kind.
    NotFound,
    /// The ID was assigned in a prior stop-generation and has since expired.
    Stale,
}

#[derive(Default)]
struct LongLivedTable {
    forward: HashMap<u64, EngineHandle>,
    reverse: HashMap<EngineHandle, u64>,
}

#[derive(Default)]
struct EphemeralTable {
    /// Live only for the current stop-generation.
    live: HashMap<u64, EngineHandle>,
    live_reverse: HashMap<EngineHandle, u64>,
    /// Every ID ever handed out for this kind, with the generation it belonged to.
    /// Retained across generation bumps purely to classify NotFound vs Stale.
    history: HashMap<u64, u64>,
}

struct Inner {
    id_gen: IdGenerator,
    stop_generation: u64,
    long_lived: HashMap<ObjectKind, LongLivedTable>,
    ephemeral: HashMap<ObjectKind, EphemeralTable>,
}

impl Inner {
    fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
            stop_generation: 0,
            long_lived: HashMap::new(),
            ephemeral: HashMap::new(),
        }
    }
}

/// The ID registry. Cheap to clone via `Arc` at the call site; internally
/// single `Mutex`-guarded with short critical sections, never held across
/// engine calls or frame writes.
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::new()) }
    }

    /// Assign a fresh stable ID for `handle` under `kind`.
    pub fn intern(&self, kind: ObjectKind, handle: EngineHandle) -> u64 {
        let mut inner = self.inner.lock();
        let id = inner.id_gen.next();
        if kind.is_ephemeral() {
            let generation = inner.stop_generation;
            let table = inner.ephemeral.entry(kind).or_default();
            table.live.insert(id, handle);
            table.live_reverse.insert(handle, id);
            table.history.insert(id, generation);
        } else {
            let table = inner.long_lived.entry(kind).or_default();
            table.forward.insert(id, handle);
            table.reverse.insert(handle, id);
        }
        id
    }

    /// Resolve a stable ID back to its engine handle.
    pub fn lookup(&self, kind: ObjectKind, id: u64) -> Result<EngineHandle, LookupError> {
        let inner = self.inner.lock();
        if kind.is_ephemeral() {
            let table = inner.ephemeral.get(&kind).ok_or(LookupError::NotFound)?;
            if let Some(handle) = table.live.get(&id) {
                return Ok(*handle);
            }
            if table.history.contains_key(&id) {
                return Err(LookupError::Stale);
            }
            Err(LookupError::NotFound)
        } else {
            inner
                .long_lived
                .get(&kind)
                .and_then(|t| t.forward.get(&id))
                .copied()
                .ok_or(LookupError::NotFound)
        }
    }

    /// Remove a long-lived mapping. No-op (but harmless) for ephemeral kinds,
    /// whose entries are only ever cleared by a generation bump.
    pub fn forget(&self, kind: ObjectKind, id: u64) {
        let mut inner = self.inner.lock();
        if kind.is_ephemeral() {
            if let Some(table) = inner.ephemeral.get_mut(&kind) {
                if let Some(handle) = table.live.remove(&id) {
                    table.live_reverse.remove(&handle);
                }
            }
        } else if let Some(table) = inner.long_lived.get_mut(&kind) {
            if let Some(handle) = table.forward.remove(&id) {
                table.reverse.remove(&handle);
            }
        }
    }

    /// Advance the stop-generation counter, purging all ephemeral mappings.
    /// IDs from the previous generation remain resolvable to [`LookupError::Stale`].
    pub fn bump_stop_generation(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.stop_generation += 1;
        for table in inner.ephemeral.values_mut() {
            table.live.clear();
            table.live_reverse.clear();
        }
        inner.stop_generation
    }

    pub fn stop_generation(&self) -> u64 {
        self.inner.lock().stop_generation
    }

    /// Reverse lookup: find the stable ID currently assigned to `handle`, if any.
    pub fn id_for_handle(&self, kind: ObjectKind, handle: EngineHandle) -> Option<u64> {
        let inner = self.inner.lock();
        if kind.is_ephemeral() {
            inner.ephemeral.get(&kind).and_then(|t| t.live_reverse.get(&handle).copied())
        } else {
            inner.long_lived.get(&kind).and_then(|t| t.reverse.get(&handle).copied())
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
