// SPDX-License-Identifier: MIT

use std::sync::Arc;

use adapter_core::registry::EngineHandle;
use adapter_core::thread::{StopInfo, WatchpointAccessType};
use adapter_engine::types::StopReason;
use adapter_engine::NullEngine;
use tokio::io::DuplexStream;

use super::*;
use crate::context::SessionContext;

fn ctx() -> Arc<SessionContext<DuplexStream>> {
    let (_client, server) = tokio::io::duplex(8192);
    Arc::new(SessionContext::new(Arc::new(NullEngine::new()), server, 1024 * 1024))
}

#[test]
fn breakpoint_stop_reason_resolves_to_registered_ids() {
    let ctx = ctx();
    let bp_handle = EngineHandle(1);
    let loc_handle = EngineHandle(2);
    let bp_id = ctx.registry.intern(ObjectKind::Breakpoint, bp_handle);
    let loc_id = ctx.registry.intern(ObjectKind::Location, loc_handle);

    let info = translate_stop_reason(&ctx, StopReason::Breakpoint { breakpoint: bp_handle, location: loc_handle });
    assert_eq!(info, StopInfo::Breakpoint { bp_id: bp_id.into(), loc_id: loc_id.into() });
}

#[test]
fn breakpoint_stop_reason_falls_back_when_handle_is_unregistered() {
    let ctx = ctx();
    let info =
        translate_stop_reason(&ctx, StopReason::Breakpoint { breakpoint: EngineHandle(77), location: EngineHandle(78) });
    assert!(matches!(info, StopInfo::Other { .. }));
}

#[test]
fn watchpoint_stop_reason_reports_access_type() {
    let ctx = ctx();
    let wp_handle = EngineHandle(3);
    let wp_id = ctx.registry.intern(ObjectKind::Watchpoint, wp_handle);

    let info = translate_stop_reason(&ctx, StopReason::Watchpoint { watchpoint: wp_handle, read: false, write: true });
    assert_eq!(info, StopInfo::Watchpoint { wp_id: wp_id.into(), access_type: WatchpointAccessType::Write });
}

#[test]
fn signal_and_step_stop_reasons_pass_through() {
    let ctx = ctx();
    assert_eq!(
        translate_stop_reason(&ctx, StopReason::Signal { signo: 11, name: "SIGSEGV".to_string() }),
        StopInfo::Signal { signo: 11, name: "SIGSEGV".to_string() }
    );
    assert_eq!(translate_stop_reason(&ctx, StopReason::Step), StopInfo::Step);
}

#[test]
fn interning_a_stopped_thread_assigns_an_id_and_caches_it() {
    let ctx = ctx();
    let stopped = adapter_engine::types::StoppedThread { handle: EngineHandle(9), reason: StopReason::Step };
    let (thread_id, thread) = intern_stopped_thread(&ctx, &stopped);
    assert_eq!(thread.id, thread_id);
    assert_eq!(thread.stop_info, Some(StopInfo::Step));
    assert_eq!(ctx.threads.lock().get(&thread_id).cloned(), Some(thread));
}

#[tokio::test]
async fn get_threads_requires_a_process() {
    let ctx = ctx();
    let err = get_threads(&ctx).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NoProcess);
}

#[tokio::test]
async fn get_threads_lists_and_caches_engine_threads() {
    let ctx = ctx();
    let target = ctx.engine.create_target("a.out").await.unwrap();
    ctx.session.create_target(target);
    ctx.session.begin_launch().unwrap();
    let process = ctx.engine.launch(target, Default::default()).await.unwrap();
    ctx.session.launch_settled(process, true);

    let threads = get_threads(&ctx).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(ctx.threads.lock().len(), 1);
}

#[tokio::test]
async fn get_frames_requires_the_process_to_be_stopped() {
    let ctx = ctx();
    let target = ctx.engine.create_target("a.out").await.unwrap();
    ctx.session.create_target(target);
    ctx.session.begin_launch().unwrap();
    let process = ctx.engine.launch(target, Default::default()).await.unwrap();
    ctx.session.launch_settled(process, false);

    let thread_handle = ctx.engine.list_threads(process).await.unwrap()[0].handle;
    let thread_id = adapter_core::id::ThreadId(ctx.registry.intern(ObjectKind::Thread, thread_handle));
    let err = get_frames(&ctx, thread_id, 0, 10).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NotStopped);
}

#[test]
fn freeze_and_unfreeze_toggle_the_frozen_set() {
    let ctx = ctx();
    let thread_id = adapter_core::id::ThreadId(1);
    freeze_thread(&ctx, thread_id);
    assert!(ctx.frozen_threads.lock().contains(&thread_id));
    unfreeze_thread(&ctx, thread_id);
    assert!(!ctx.frozen_threads.lock().contains(&thread_id));
}
