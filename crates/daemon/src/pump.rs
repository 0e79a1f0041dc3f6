// SPDX-License-Identifier: MIT

//! Event Pump: runs on a dedicated task for the lifetime of the connection,
//! translating asynchronous engine notifications into protocol events. The
//! dispatcher task (`process`/`breakpoints`/`values` handlers)
//! owns every *synchronous* state transition (launch, continue, step); this
//! pump owns transitions the engine reports on its own schedule — a process
//! hitting a breakpoint after `Continue`, a module loading and resolving a
//! pending breakpoint, stdout/stderr, and process exit.

use std::sync::Arc;

use adapter_core::registry::ObjectKind;
use adapter_engine::types::EngineEvent;
use adapter_wire::Event;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::breakpoints::intern_location;
use crate::context::SessionContext;
use crate::threads::intern_stopped_thread;

pub async fn run<W: AsyncWrite + Unpin + Send + 'static>(
    ctx: Arc<SessionContext<W>>,
    mut events: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => event,
        };
        match event {
            None => {
                debug!("engine event channel closed; event pump exiting");
                break;
            }
            Some(event) => {
                // A failure translating one event is logged and skipped
                // rather than tearing down the pump. None of the
                // translations below are fallible today, but the pattern
                // match is exhaustive so a future variant that can fail
                // keeps this contract without a redesign.
                handle_event(&ctx, event).await;
            }
        }
    }
}

async fn handle_event<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, event: EngineEvent) {
    match event {
        EngineEvent::ProcessRunning => {
            // Already bumped by the dispatcher for requests it initiates
            // (Continue/Step); an engine-initiated run (e.g. after a signal
            // is passed through) still needs to purge ephemeral ids here.
            if ctx.session.state() != adapter_core::State::Running {
                let generation = ctx.bump_generation();
                let _ = ctx.send_frame(&Event::ProcessRunning { stop_generation: generation }).await;
            }
        }
        EngineEvent::ProcessStopped { stopped_threads } => {
            ctx.session.engine_stopped();
            let generation = ctx.registry.stop_generation();
            for stopped in &stopped_threads {
                let (thread_id, thread) = intern_stopped_thread(ctx, stopped);
                let reason = thread
                    .stop_info
                    .unwrap_or(adapter_core::thread::StopInfo::Other { description: "stopped".to_string() });
                let _ = ctx.send_frame(&Event::Stopped { thread_id, reason, stop_generation: generation }).await;
            }
        }
        EngineEvent::ProcessExited { exit_code } => {
            ctx.session.process_exited();
            let _ = ctx.send_frame(&Event::ProcessExited { exit_code }).await;
        }
        EngineEvent::BreakpointLocationsResolved { breakpoint, locations } => {
            let Some(bp_id) = ctx.registry.id_for_handle(ObjectKind::Breakpoint, breakpoint) else {
                warn!("LOCATIONS_RESOLVED for an unregistered breakpoint handle");
                return;
            };
            let bp_id = adapter_core::id::BreakpointId(bp_id);
            let resolved: Vec<_> = locations.iter().map(|rl| intern_location(&ctx.registry, rl)).collect();
            if let Some(bp) = ctx.breakpoints.lock().get_mut(&bp_id) {
                bp.locations = resolved.clone();
            }
            let _ = ctx
                .send_frame(&Event::BreakpointLocationsResolved { breakpoint_id: bp_id, locations: resolved })
                .await;
        }
        EngineEvent::ModuleLoaded(module) => {
            let module_id = adapter_core::id::ModuleId(ctx.registry.intern(ObjectKind::Module, module.handle));
            let _ = ctx.send_frame(&Event::ModuleLoaded { module_id, path: module.path }).await;
        }
        EngineEvent::ModuleUnloaded { handle } => {
            let Some(module_id) = ctx.registry.id_for_handle(ObjectKind::Module, handle) else {
                return;
            };
            let module_id = adapter_core::id::ModuleId(module_id);
            ctx.registry.forget(ObjectKind::Module, module_id.0);
            let _ = ctx.send_frame(&Event::ModuleUnloaded { module_id }).await;
        }
        EngineEvent::StdOut(bytes) => {
            let _ = ctx.send_frame(&Event::StdOut { bytes }).await;
        }
        EngineEvent::StdErr(bytes) => {
            let _ = ctx.send_frame(&Event::StdErr { bytes }).await;
        }
    }
}

#[cfg(test)]
#[path = "pump_tests.rs"]
mod tests;
