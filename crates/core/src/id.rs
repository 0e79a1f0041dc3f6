// SPDX-License-Identifier: MIT

//! Stable protocol IDs.
//!
//! Every object the wire protocol names — breakpoints, watchpoints, threads,
//! frames, values, modules, breakpoint locations — gets a 64-bit ID assigned
//! by [`crate::registry::Registry`]. Zero is reserved for "absent"; IDs are
//! monotonic and never reused within a session.

use std::sync::atomic::{AtomicU64, Ordering};

/// Define a newtype wrapper around a non-zero stable ID.
///
/// ```ignore
/// define_stable_id!(BreakpointId);
/// ```
#[macro_export]
macro_rules! define_stable_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The reserved "absent" value. Never assigned by the registry.
            pub const NONE: Self = Self(0);

            pub fn is_none(&self) -> bool {
                self.0 == 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }
    };
}

define_stable_id!(
    /// Stable ID of a breakpoint (line/address/function/symbol/regex), long-lived.
    BreakpointId
);
define_stable_id!(
    /// Stable ID of a watchpoint, long-lived.
    WatchpointId
);
define_stable_id!(
    /// Stable ID of a resolved breakpoint location, long-lived for the owning breakpoint.
    LocationId
);
define_stable_id!(
    /// Stable ID of a loaded module, long-lived.
    ModuleId
);
define_stable_id!(
    /// Stable ID of a thread, ephemeral: valid only within the current stop-generation.
    ThreadId
);
define_stable_id!(
    /// Stable ID of a stack frame, ephemeral: valid only within the current stop-generation.
    FrameId
);
define_stable_id!(
    /// Stable ID of a value (variable/child/evaluation result), ephemeral.
    ValueId
);

/// Monotonic ID generator shared by all object kinds.
///
/// A single counter (rather than one per kind) is sufficient to satisfy the
/// spec's invariants ("IDs are never zero", "never reused") and avoids a
/// pitfall where two different kinds could otherwise compare equal by
/// coincidence if ever stored in a kind-erased context.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    /// Allocate the next monotonic value. Never returns 0.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
