// SPDX-License-Identifier: MIT

//! Thread/frame handlers and the engine→protocol stop-info translation
//! shared by the Request Dispatcher and the Event Pump.

use adapter_core::error::AdapterError;
use adapter_core::id::{FrameId, ThreadId};
use adapter_core::registry::ObjectKind;
use adapter_core::thread::{StackFrame, StopInfo, Thread, ThreadRunState, WatchpointAccessType};
use adapter_engine::types::{StopReason, StoppedThread};
use tokio::io::AsyncWrite;

use crate::context::SessionContext;
use crate::error::{engine_err, lookup_err};

/// Translate an engine-reported stop reason into the protocol-facing
/// [`StopInfo`] union, resolving breakpoint/watchpoint handles back to their
/// stable IDs. Only the variants the underlying engine actually reports are
/// populated; everything else falls back to an opaque description.
pub(crate) fn translate_stop_reason<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    reason: StopReason,
) -> StopInfo {
    match reason {
        StopReason::Breakpoint { breakpoint, location } => {
            match (
                ctx.registry.id_for_handle(ObjectKind::Breakpoint, breakpoint),
                ctx.registry.id_for_handle(ObjectKind::Location, location),
            ) {
                (Some(bp_id), Some(loc_id)) => {
                    StopInfo::Breakpoint { bp_id: bp_id.into(), loc_id: loc_id.into() }
                }
                _ => StopInfo::Other { description: "breakpoint hit (unknown id)".to_string() },
            }
        }
        StopReason::Watchpoint { watchpoint, read, write } => {
            match ctx.registry.id_for_handle(ObjectKind::Watchpoint, watchpoint) {
                Some(wp_id) => {
                    let access_type = match (read, write) {
                        (true, true) => WatchpointAccessType::ReadWrite,
                        (true, false) => WatchpointAccessType::Read,
                        _ => WatchpointAccessType::Write,
                    };
                    StopInfo::Watchpoint { wp_id: wp_id.into(), access_type }
                }
                None => StopInfo::Other { description: "watchpoint hit (unknown id)".to_string() },
            }
        }
        StopReason::Signal { signo, name } => StopInfo::Signal { signo, name },
        StopReason::Exception { description } => StopInfo::Exception { description },
        StopReason::Step => StopInfo::Step,
        StopReason::PlanComplete => StopInfo::PlanComplete,
        StopReason::Exec => StopInfo::Exec,
        StopReason::Trace => StopInfo::Trace,
        StopReason::Other { description } => StopInfo::Other { description },
    }
}

/// Intern a freshly stopped thread, assigning it a [`ThreadId`] in the
/// current stop-generation and recording its stop-info for later
/// `GetThreads`/`Variables` queries.
pub(crate) fn intern_stopped_thread<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    stopped: &StoppedThread,
) -> (ThreadId, Thread) {
    let id = ThreadId(ctx.registry.intern(ObjectKind::Thread, stopped.handle));
    let stop_info = translate_stop_reason(ctx, stopped.reason.clone());
    let thread = Thread {
        id,
        native_tid: 0,
        name: String::new(),
        state: ThreadRunState::Stopped,
        stop_info: Some(stop_info),
    };
    ctx.threads.lock().insert(id, thread.clone());
    (id, thread)
}

pub(crate) async fn get_threads<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
) -> Result<Vec<Thread>, AdapterError> {
    let process = ctx.session.require_process()?;
    let infos = ctx.engine.list_threads(process).await.map_err(engine_err)?;
    let mut threads = ctx.threads.lock();
    let mut out = Vec::with_capacity(infos.len());
    for info in infos {
        let id = ThreadId(
            ctx.registry
                .id_for_handle(ObjectKind::Thread, info.handle)
                .unwrap_or_else(|| ctx.registry.intern(ObjectKind::Thread, info.handle)),
        );
        let thread = threads.entry(id).or_insert_with(|| Thread {
            id,
            native_tid: info.native_tid,
            name: info.name.clone(),
            state: ThreadRunState::Stopped,
            stop_info: None,
        });
        thread.native_tid = info.native_tid;
        thread.name = info.name;
        out.push(thread.clone());
    }
    Ok(out)
}

pub(crate) async fn get_frames<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    thread_id: ThreadId,
    start: u32,
    count: u32,
) -> Result<Vec<StackFrame>, AdapterError> {
    ctx.session.require_stopped()?;
    let handle =
        ctx.registry.lookup(ObjectKind::Thread, thread_id.0).map_err(|e| lookup_err("thread", e))?;
    let infos = ctx.engine.get_frames(handle, start, count).await.map_err(engine_err)?;
    let mut frames = ctx.frames.lock();
    let out: Vec<StackFrame> = infos
        .into_iter()
        .map(|info| {
            let id = FrameId(ctx.registry.intern(ObjectKind::Frame, info.handle));
            let source_location = info.file_path.map(|file_path| adapter_core::breakpoint::SourceLocation {
                file_path,
                line: info.line.unwrap_or(0),
                column: None,
            });
            let frame = StackFrame {
                id,
                function_name: info.function_name,
                source_location,
                program_counter: info.program_counter,
            };
            frames.insert(id, frame.clone());
            frame
        })
        .collect();
    Ok(out)
}

pub(crate) fn freeze_thread<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, thread_id: ThreadId) {
    ctx.frozen_threads.lock().insert(thread_id);
}

pub(crate) fn unfreeze_thread<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, thread_id: ThreadId) {
    ctx.frozen_threads.lock().remove(&thread_id);
}

#[cfg(test)]
#[path = "threads_tests.rs"]
mod tests;
