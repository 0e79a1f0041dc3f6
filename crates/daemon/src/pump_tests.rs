// SPDX-License-Identifier: MIT

use std::sync::Arc;

use adapter_core::registry::{EngineHandle, ObjectKind};
use adapter_core::State;
use adapter_engine::types::{ModuleInfo, ResolvedLocation, StopReason, StoppedThread};
use adapter_engine::NullEngine;
use adapter_wire::Event;
use tokio::io::DuplexStream;

use super::*;
use crate::context::SessionContext;

fn ctx() -> (Arc<SessionContext<DuplexStream>>, DuplexStream) {
    let (client, server) = tokio::io::duplex(8192);
    (Arc::new(SessionContext::new(Arc::new(NullEngine::new()), server, 1024 * 1024)), client)
}

async fn recv_event(client: &mut DuplexStream) -> Event {
    let bytes = adapter_wire::read_message(client).await.unwrap();
    adapter_wire::decode(&bytes).unwrap()
}

#[tokio::test]
async fn process_running_bumps_generation_and_emits_event() {
    let (ctx, mut client) = ctx();
    assert_eq!(ctx.registry.stop_generation(), 0);

    handle_event(&ctx, EngineEvent::ProcessRunning).await;

    assert_eq!(ctx.registry.stop_generation(), 1);
    let event = recv_event(&mut client).await;
    assert_eq!(event, Event::ProcessRunning { stop_generation: 1 });
}

#[tokio::test]
async fn process_running_is_a_no_op_if_the_dispatcher_already_bumped() {
    let (ctx, mut client) = ctx();
    ctx.session.create_target(EngineHandle(1));
    ctx.session.begin_launch().unwrap();
    ctx.session.launch_settled(EngineHandle(2), false);
    assert_eq!(ctx.session.state(), State::Running);

    handle_event(&ctx, EngineEvent::ProcessRunning).await;

    // No event should have been written; generation is untouched.
    assert_eq!(ctx.registry.stop_generation(), 0);
    drop(ctx);
    // The writer half was dropped with ctx; reading now should hit EOF, not
    // a previously-buffered frame.
    let mut buf = [0u8; 1];
    use tokio::io::AsyncReadExt;
    assert_eq!(client.read(&mut buf).await.unwrap(), 0);
}

#[tokio::test]
async fn process_stopped_interns_threads_and_emits_one_event_per_thread() {
    let (ctx, mut client) = ctx();
    let stopped = vec![StoppedThread { handle: EngineHandle(5), reason: StopReason::Step }];

    handle_event(&ctx, EngineEvent::ProcessStopped { stopped_threads: stopped }).await;

    assert_eq!(ctx.session.state(), State::Stopped);
    let event = recv_event(&mut client).await;
    match event {
        Event::Stopped { reason, .. } => assert_eq!(reason, adapter_core::thread::StopInfo::Step),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn process_exited_updates_state_and_emits_exit_code() {
    let (ctx, mut client) = ctx();
    handle_event(&ctx, EngineEvent::ProcessExited { exit_code: Some(1) }).await;
    assert_eq!(ctx.session.state(), State::Exited);
    assert_eq!(recv_event(&mut client).await, Event::ProcessExited { exit_code: Some(1) });
}

#[tokio::test]
async fn locations_resolved_updates_the_stored_breakpoint_and_emits_event() {
    let (ctx, mut client) = ctx();
    let bp_handle = EngineHandle(1);
    let bp_id = adapter_core::id::BreakpointId(ctx.registry.intern(ObjectKind::Breakpoint, bp_handle));
    ctx.breakpoints.lock().insert(
        bp_id,
        adapter_core::breakpoint::Breakpoint::new(bp_id, adapter_core::breakpoint::BreakpointSpec::Address { addr: 0 }),
    );

    let locations = vec![ResolvedLocation { handle: EngineHandle(2), address: 0x401020, file_path: None, line: None }];
    handle_event(&ctx, EngineEvent::BreakpointLocationsResolved { breakpoint: bp_handle, locations }).await;

    assert_eq!(ctx.breakpoints.lock().get(&bp_id).unwrap().locations.len(), 1);
    let event = recv_event(&mut client).await;
    match event {
        Event::BreakpointLocationsResolved { breakpoint_id, locations } => {
            assert_eq!(breakpoint_id, bp_id);
            assert_eq!(locations.len(), 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn locations_resolved_for_unregistered_breakpoint_is_logged_and_skipped() {
    let (ctx, mut client) = ctx();
    handle_event(
        &ctx,
        EngineEvent::BreakpointLocationsResolved { breakpoint: EngineHandle(999), locations: Vec::new() },
    )
    .await;
    drop(ctx);
    let mut buf = [0u8; 1];
    use tokio::io::AsyncReadExt;
    assert_eq!(client.read(&mut buf).await.unwrap(), 0);
}

#[tokio::test]
async fn module_loaded_then_unloaded_round_trips_the_module_id() {
    let (ctx, mut client) = ctx();
    let handle = EngineHandle(7);
    handle_event(&ctx, EngineEvent::ModuleLoaded(ModuleInfo { handle, path: "libfoo.so".to_string() })).await;
    let loaded = recv_event(&mut client).await;
    let module_id = match loaded {
        Event::ModuleLoaded { module_id, path } => {
            assert_eq!(path, "libfoo.so");
            module_id
        }
        other => panic!("unexpected event: {other:?}"),
    };

    handle_event(&ctx, EngineEvent::ModuleUnloaded { handle }).await;
    assert_eq!(recv_event(&mut client).await, Event::ModuleUnloaded { module_id });
    assert_eq!(ctx.registry.id_for_handle(ObjectKind::Module, handle), None);
}

#[tokio::test]
async fn stdout_and_stderr_are_forwarded_verbatim() {
    let (ctx, mut client) = ctx();
    handle_event(&ctx, EngineEvent::StdOut(b"hello\n".to_vec())).await;
    assert_eq!(recv_event(&mut client).await, Event::StdOut { bytes: b"hello\n".to_vec() });
    handle_event(&ctx, EngineEvent::StdErr(b"oops\n".to_vec())).await;
    assert_eq!(recv_event(&mut client).await, Event::StdErr { bytes: b"oops\n".to_vec() });
}
