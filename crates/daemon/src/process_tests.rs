// SPDX-License-Identifier: MIT

use std::sync::Arc;

use adapter_core::State;
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
async fn create_target_rejects_an_empty_path() {
    let (ctx, _client) = ctx();
    let err = create_target(&ctx, String::new()).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn create_target_drops_the_old_targets_breakpoints() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let bp_id = adapter_core::id::BreakpointId(1);
    ctx.breakpoints.lock().insert(
        bp_id,
        adapter_core::breakpoint::Breakpoint::new(bp_id, adapter_core::breakpoint::BreakpointSpec::Address { addr: 0 }),
    );

    create_target(&ctx, "b.out".to_string()).await.unwrap();

    assert!(ctx.breakpoints.lock().is_empty());
    assert_eq!(recv_event(&mut client).await, Event::BreakpointRemoved { id: bp_id });
}

#[tokio::test]
async fn launch_stopped_at_entry_emits_initialized_then_stopped() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();

    let spec = to_launch_spec(vec!["a.out".to_string()], Default::default(), None, None, None, None, true);
    launch(&ctx, spec).await.unwrap();

    assert_eq!(recv_event(&mut client).await, Event::Initialized);
    match recv_event(&mut client).await {
        Event::Stopped { .. } => {}
        other => panic!("expected Stopped, got {other:?}"),
    }
    assert_eq!(ctx.session.state(), State::Stopped);
}

#[tokio::test]
async fn launch_running_emits_initialized_then_process_running() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();

    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, false);
    launch(&ctx, spec).await.unwrap();

    assert_eq!(recv_event(&mut client).await, Event::Initialized);
    assert_eq!(recv_event(&mut client).await, Event::ProcessRunning { stop_generation: 1 });
    assert_eq!(ctx.session.state(), State::Running);
}

#[tokio::test]
async fn initialized_is_not_re_emitted_on_relaunch() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, false);
    launch(&ctx, spec.clone()).await.unwrap();
    assert_eq!(recv_event(&mut client).await, Event::Initialized);
    assert_eq!(recv_event(&mut client).await, Event::ProcessRunning { stop_generation: 1 });

    kill(&ctx).await.unwrap();
    assert_eq!(recv_event(&mut client).await, Event::ProcessExited { exit_code: None });

    launch(&ctx, spec).await.unwrap();
    // No Initialized the second time — straight to ProcessRunning.
    assert_eq!(recv_event(&mut client).await, Event::ProcessRunning { stop_generation: 2 });
}

#[tokio::test]
async fn attach_requires_a_target_first() {
    let (ctx, _client) = ctx();
    assert!(attach(&ctx, 1234).await.is_err());
}

#[tokio::test]
async fn attach_by_name_rejects_an_empty_name() {
    let (ctx, _client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let err = attach_by_name(&ctx, String::new(), false).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn continue_from_stopped_bumps_generation_and_emits_running() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, true);
    launch(&ctx, spec).await.unwrap();
    let _ = recv_event(&mut client).await; // Initialized
    let _ = recv_event(&mut client).await; // Stopped

    continue_execution(&ctx).await.unwrap();
    assert_eq!(recv_event(&mut client).await, Event::ProcessRunning { stop_generation: 1 });
    assert_eq!(ctx.session.state(), State::Running);
}

#[tokio::test]
async fn continue_while_already_running_is_rejected() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, false);
    launch(&ctx, spec).await.unwrap();
    let _ = recv_event(&mut client).await; // Initialized
    let _ = recv_event(&mut client).await; // ProcessRunning

    let err = continue_execution(&ctx).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NotStopped);
}

#[tokio::test]
async fn step_in_resumes_and_stops_with_step_reason() {
    let (ctx, mut client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, true);
    launch(&ctx, spec).await.unwrap();
    let _ = recv_event(&mut client).await; // Initialized
    let _ = recv_event(&mut client).await; // Stopped

    step_in(&ctx, true).await.unwrap();
    assert_eq!(recv_event(&mut client).await, Event::ProcessRunning { stop_generation: 1 });
    match recv_event(&mut client).await {
        Event::Stopped { reason, stop_generation, .. } => {
            assert_eq!(reason, adapter_core::thread::StopInfo::Step);
            assert_eq!(stop_generation, 1);
        }
        other => panic!("expected Stopped, got {other:?}"),
    }
    assert_eq!(ctx.session.state(), State::Stopped);
}

#[tokio::test]
async fn jump_to_line_requires_a_known_thread_id() {
    let (ctx, _client) = ctx();
    create_target(&ctx, "a.out".to_string()).await.unwrap();
    let spec = to_launch_spec(Vec::new(), Default::default(), None, None, None, None, true);
    launch(&ctx, spec).await.unwrap();

    let err = jump_to_line(&ctx, adapter_core::id::ThreadId(999), "main.rs".to_string(), 10).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NotFound);
}

#[tokio::test]
async fn handle_signal_requires_a_process() {
    let (ctx, _client) = ctx();
    let err = handle_signal(&ctx, 2, true, false, true).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NoProcess);
}

#[tokio::test]
async fn execute_shell_command_rejects_an_empty_command() {
    let (ctx, _client) = ctx();
    let err = execute_shell_command(&ctx, String::new(), None, None).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn connect_platform_rejects_an_empty_url() {
    let (ctx, _client) = ctx();
    assert!(connect_platform(&ctx, String::new()).await.is_err());
    assert!(connect_platform(&ctx, "connect://host:1234".to_string()).await.is_ok());
}

#[tokio::test]
async fn create_target_accepts_a_real_executable_path() {
    let (ctx, _client) = ctx();
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_string_lossy().to_string();
    create_target(&ctx, path).await.unwrap();
    assert_eq!(ctx.session.state(), State::TargetCreated);
}

#[tokio::test]
async fn load_core_accepts_a_real_core_file_path() {
    let (ctx, mut client) = ctx();
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_string_lossy().to_string();
    load_core(&ctx, path).await.unwrap();
    assert_eq!(ctx.session.state(), State::Attaching);
    assert_eq!(recv_event(&mut client).await, Event::Initialized);
}
