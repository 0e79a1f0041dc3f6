// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn lookup_of_interned_handle_returns_same_handle() {
    let reg = Registry::new();
    let handle = EngineHandle(7);
    let id = reg.intern(ObjectKind::Breakpoint, handle);
    assert_eq!(reg.lookup(ObjectKind::Breakpoint, id), Ok(handle));
}

#[test]
fn forget_removes_long_lived_mapping() {
    let reg = Registry::new();
    let id = reg.intern(ObjectKind::Breakpoint, EngineHandle(1));
    reg.forget(ObjectKind::Breakpoint, id);
    assert_eq!(reg.lookup(ObjectKind::Breakpoint, id), Err(LookupError::NotFound));
}

#[test]
fn ephemeral_id_stale_after_generation_bump() {
    let reg = Registry::new();
    let id = reg.intern(ObjectKind::Thread, EngineHandle(42));
    assert_eq!(reg.lookup(ObjectKind::Thread, id), Ok(EngineHandle(42)));

    reg.bump_stop_generation();
    assert_eq!(reg.lookup(ObjectKind::Thread, id), Err(LookupError::Stale));
}

#[test]
fn unknown_id_is_not_found_not_stale() {
    let reg = Registry::new();
    assert_eq!(reg.lookup(ObjectKind::Thread, 9999), Err(LookupError::NotFound));
    assert_eq!(reg.lookup(ObjectKind::Breakpoint, 9999), Err(LookupError::NotFound));
}

#[test]
fn long_lived_ids_survive_generation_bump() {
    let reg = Registry::new();
    let id = reg.intern(ObjectKind::Breakpoint, EngineHandle(5));
    reg.bump_stop_generation();
    reg.bump_stop_generation();
    assert_eq!(reg.lookup(ObjectKind::Breakpoint, id), Ok(EngineHandle(5)));
}

#[test]
fn distinct_handles_never_collide_on_stable_id() {
    let reg = Registry::new();
    let a = reg.intern(ObjectKind::Value, EngineHandle(1));
    let b = reg.intern(ObjectKind::Value, EngineHandle(2));
    assert_ne!(a, b);
}

#[test]
fn stop_generation_monotonic_and_starts_at_zero() {
    let reg = Registry::new();
    assert_eq!(reg.stop_generation(), 0);
    assert_eq!(reg.bump_stop_generation(), 1);
    assert_eq!(reg.bump_stop_generation(), 2);
    assert_eq!(reg.stop_generation(), 2);
}

#[test]
fn ephemeral_ids_from_different_generations_are_independent() {
    let reg = Registry::new();
    let id_gen0 = reg.intern(ObjectKind::Frame, EngineHandle(1));
    reg.bump_stop_generation();
    let id_gen1 = reg.intern(ObjectKind::Frame, EngineHandle(1));
    assert_eq!(reg.lookup(ObjectKind::Frame, id_gen1), Ok(EngineHandle(1)));
    assert_eq!(reg.lookup(ObjectKind::Frame, id_gen0), Err(LookupError::Stale));
}
