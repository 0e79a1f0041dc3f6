// SPDX-License-Identifier: MIT

//! Request dispatcher: decodes one frame as a [`Request`], routes it to the
//! matching handler by variant, and builds the correlated [`Response`].
//! Exactly one response per request, always carrying the request's hash.

use std::sync::Arc;

use adapter_core::error::{AdapterError, ErrorKind};
use adapter_wire::{Request, RequestBody, Response, ResponseBody};
use tokio::io::AsyncWrite;
use tracing::{error, info};

use crate::context::SessionContext;
use crate::{breakpoints, console, memory, process, threads, values};

/// Decode a raw frame payload and dispatch it, producing the [`Response`] to
/// write back. Never panics or propagates a handler error past this
/// boundary: an error from a handler is captured into the response's error
/// fields rather than bubbling up to the connection's main loop.
pub async fn handle_frame<W: AsyncWrite + Unpin + Send>(
    ctx: &Arc<SessionContext<W>>,
    bytes: &[u8],
) -> Response {
    let request = match Request::decode_lenient(bytes) {
        Ok(request) => request,
        Err(hash) => {
            return Response::error(
                hash,
                &AdapterError::new(ErrorKind::UnknownRequest, "unrecognized request variant"),
            );
        }
    };

    ctx.session.begin_request(request.hash.clone());
    info!(variant = request_variant_name(&request.body), "dispatching request");
    let outcome = dispatch(ctx, request.body).await;
    ctx.session.end_request(&request.hash);

    match outcome {
        Ok(body) => Response::ok(request.hash, body),
        Err(err) => {
            error!(kind = ?err.kind, message = %err.message, "request failed");
            Response::error(request.hash, &err)
        }
    }
}

async fn dispatch<W: AsyncWrite + Unpin + Send>(
    ctx: &Arc<SessionContext<W>>,
    body: RequestBody,
) -> Result<ResponseBody, AdapterError> {
    match body {
        // --- target & process ---
        RequestBody::CreateTarget { file_path } => {
            process::create_target(ctx, file_path).await?;
            Ok(ResponseBody::TargetCreated)
        }
        RequestBody::Attach { pid } => {
            process::attach(ctx, pid).await?;
            Ok(ResponseBody::Attached)
        }
        RequestBody::AttachByName { name, wait_for } => {
            process::attach_by_name(ctx, name, wait_for).await?;
            Ok(ResponseBody::Attached)
        }
        RequestBody::LoadCore { core_path } => {
            process::load_core(ctx, core_path).await?;
            Ok(ResponseBody::TargetCreated)
        }
        RequestBody::Launch { argv, env, cwd, stdin_path, stdout_path, stderr_path, stop_at_entry } => {
            let spec = process::to_launch_spec(argv, env, cwd, stdin_path, stdout_path, stderr_path, stop_at_entry);
            process::launch(ctx, spec).await?;
            Ok(ResponseBody::Ok)
        }
        RequestBody::Detach => {
            process::detach(ctx).await?;
            Ok(ResponseBody::Detached)
        }
        RequestBody::Kill => {
            process::kill(ctx).await?;
            Ok(ResponseBody::Killed)
        }
        RequestBody::Exit => Ok(ResponseBody::Ok),
        RequestBody::ConnectPlatform { url } => {
            process::connect_platform(ctx, url).await?;
            Ok(ResponseBody::Ok)
        }
        RequestBody::ConnectProcess { pid } => {
            process::connect_process(ctx, pid).await?;
            Ok(ResponseBody::Attached)
        }

        // --- execution ---
        RequestBody::Continue => {
            process::continue_execution(ctx).await?;
            Ok(ResponseBody::Continued)
        }
        RequestBody::Suspend => {
            process::suspend(ctx).await?;
            Ok(ResponseBody::Suspended)
        }
        RequestBody::StepIn { step_by_instruction } => {
            process::step_in(ctx, step_by_instruction).await?;
            Ok(ResponseBody::Stepped)
        }
        RequestBody::StepOver { step_by_instruction } => {
            process::step_over(ctx, step_by_instruction).await?;
            Ok(ResponseBody::Stepped)
        }
        RequestBody::StepOut => {
            process::step_out(ctx).await?;
            Ok(ResponseBody::Stepped)
        }
        RequestBody::StepScripted { class_name } => {
            if class_name.is_empty() {
                return Err(AdapterError::invalid_argument("class_name must not be empty"));
            }
            process::step_over(ctx, false).await?;
            Ok(ResponseBody::Stepped)
        }
        RequestBody::JumpToLine { file_path, line } => {
            let thread_id = primary_thread(ctx)?;
            process::jump_to_line(ctx, thread_id, file_path, line).await?;
            Ok(ResponseBody::Jumped)
        }
        RequestBody::JumpToAddress { address } => {
            let thread_id = primary_thread(ctx)?;
            process::jump_to_address(ctx, thread_id, address).await?;
            Ok(ResponseBody::Jumped)
        }

        // --- breakpoints ---
        RequestBody::AddBreakpoint { spec, condition, ignore_count } => {
            let bp = breakpoints::add_breakpoint(ctx, spec, condition, ignore_count).await?;
            Ok(ResponseBody::BreakpointAdded { breakpoint: bp })
        }
        RequestBody::RemoveBreakpoint { id } => {
            breakpoints::remove_breakpoint(ctx, id).await?;
            Ok(ResponseBody::BreakpointRemoved)
        }
        RequestBody::AddWatchpoint { address, size_bytes, read, write } => {
            let wp = breakpoints::add_watchpoint(ctx, address, size_bytes, read, write).await?;
            Ok(ResponseBody::WatchpointAdded { watchpoint: wp })
        }
        RequestBody::RemoveWatchpoint { id } => {
            breakpoints::remove_watchpoint(ctx, id).await?;
            Ok(ResponseBody::WatchpointRemoved)
        }
        RequestBody::SetBreakpointCondition { id, condition } => {
            let bp = breakpoints::set_condition(ctx, id, condition).await?;
            Ok(ResponseBody::BreakpointUpdated { breakpoint: bp })
        }
        RequestBody::SetBreakpointIgnoreCount { id, ignore_count } => {
            let bp = breakpoints::set_ignore_count(ctx, id, ignore_count).await?;
            Ok(ResponseBody::BreakpointUpdated { breakpoint: bp })
        }
        RequestBody::SetBreakpointEnabled { id, enabled } => {
            let bp = breakpoints::set_enabled(ctx, id, enabled).await?;
            Ok(ResponseBody::BreakpointUpdated { breakpoint: bp })
        }
        RequestBody::SetBreakpointThreadRestriction { id, thread_id } => {
            let bp = breakpoints::set_thread_restriction(ctx, id, thread_id).await?;
            Ok(ResponseBody::BreakpointUpdated { breakpoint: bp })
        }
        RequestBody::SetWatchpointEnabled { id, enabled } => {
            let wp = breakpoints::set_watchpoint_enabled(ctx, id, enabled).await?;
            Ok(ResponseBody::WatchpointUpdated { watchpoint: wp })
        }

        // --- threads/frames ---
        RequestBody::GetThreads => {
            let list = threads::get_threads(ctx).await?;
            Ok(ResponseBody::Threads { threads: list })
        }
        RequestBody::GetFrames { thread_id, start, count } => {
            let frames = threads::get_frames(ctx, thread_id, start, count).await?;
            Ok(ResponseBody::Frames { frames })
        }
        RequestBody::FreezeThread { thread_id } => {
            threads::freeze_thread(ctx, thread_id);
            Ok(ResponseBody::Ok)
        }
        RequestBody::UnfreezeThread { thread_id } => {
            threads::unfreeze_thread(ctx, thread_id);
            Ok(ResponseBody::Ok)
        }

        // --- values ---
        RequestBody::Variables { frame_id, kind_mask, filter_policy } => {
            let list = values::variables(ctx, frame_id, kind_mask, filter_policy).await?;
            Ok(ResponseBody::Variables { values: list })
        }
        RequestBody::ValueChildren { value_id, offset, count, max_depth: _, max_children } => {
            let page = values::children(ctx, value_id, offset, count, max_children).await?;
            Ok(ResponseBody::Children { page })
        }
        RequestBody::ValueData { value_id } => {
            let (bytes, encoding) = values::data(ctx, value_id).await?;
            Ok(ResponseBody::ValueData { bytes, encoding })
        }
        RequestBody::ValueDescription { value_id } => {
            let summary = values::description(ctx, value_id).await?;
            Ok(ResponseBody::ValueDescription { summary })
        }
        RequestBody::ValueAddress { value_id } => {
            let address = values::address(ctx, value_id)?;
            Ok(ResponseBody::ValueAddress { address })
        }
        RequestBody::ChildrenCount { value_id } => {
            let count = values::children_count(ctx, value_id)?;
            Ok(ResponseBody::ChildrenCount { count })
        }
        RequestBody::ArraySlice { value_id, offset, count } => {
            let list = values::array_slice(ctx, value_id, offset, count).await?;
            Ok(ResponseBody::ArraySlice { values: list })
        }
        RequestBody::SetValueFilteringPolicy { policy } => {
            values::set_filtering_policy(ctx, policy);
            Ok(ResponseBody::FilteringPolicySet)
        }
        RequestBody::Evaluate { frame_id, expression } => {
            let value = values::evaluate(ctx, frame_id, expression).await?;
            Ok(ResponseBody::Evaluated { value })
        }

        // --- memory/disassembly ---
        RequestBody::DumpMemory { address, length } => {
            let bytes = memory::dump_memory(ctx, address, length).await?;
            Ok(ResponseBody::Memory { bytes })
        }
        RequestBody::WriteMemory { address, bytes } => {
            let bytes_written = memory::write_memory(ctx, address, bytes).await?;
            Ok(ResponseBody::MemoryWritten { bytes_written })
        }
        RequestBody::Disassemble { address, byte_count, instruction_count, thread_id: _ } => {
            let lines = memory::disassemble(ctx, address, byte_count, instruction_count).await?;
            Ok(ResponseBody::Disassembly { lines })
        }
        RequestBody::DumpSections => {
            let sections = memory::dump_sections(ctx).await?;
            Ok(ResponseBody::Sections { sections })
        }
        RequestBody::GetContextInfo => {
            let summary = memory::get_context_info(ctx).await?;
            Ok(ResponseBody::ContextInfo { summary })
        }

        // --- registers ---
        RequestBody::GetRegisters { thread_id, group_names, register_names } => {
            let values = memory::get_registers(ctx, thread_id, group_names, register_names).await?;
            Ok(ResponseBody::Registers { values })
        }
        RequestBody::GetRegisterSets { thread_id } => {
            let sets = memory::get_register_sets(ctx, thread_id).await?;
            Ok(ResponseBody::RegisterSets { sets })
        }
        RequestBody::GetArchitecture => {
            let triple = memory::get_architecture(ctx).await?;
            Ok(ResponseBody::Architecture { triple })
        }

        // --- console/commands ---
        RequestBody::HandleConsoleCommand { command } => {
            let text = console::handle_console_command(&command)?;
            Ok(ResponseBody::ConsoleOutput { text })
        }
        RequestBody::HandleCompletion { text, cursor_pos } => {
            let items = console::handle_completion(&text, cursor_pos);
            Ok(ResponseBody::Completions { items })
        }
        RequestBody::DispatchInput { bytes } => {
            console::dispatch_input(&bytes);
            Ok(ResponseBody::Ok)
        }
        RequestBody::ResizeConsole { cols, rows } => {
            console::resize_console(cols, rows)?;
            Ok(ResponseBody::Ok)
        }

        // --- signals/symbols/shell ---
        RequestBody::HandleSignal { signo, pass, stop, notify } => {
            process::handle_signal(ctx, signo, pass, stop, notify).await?;
            Ok(ResponseBody::Ok)
        }
        RequestBody::ExecuteShellCommand { command, cwd, timeout_ms } => {
            let text = process::execute_shell_command(ctx, command, cwd, timeout_ms).await?;
            Ok(ResponseBody::ConsoleOutput { text })
        }
        RequestBody::CancelSymbolsDownload => {
            process::cancel_symbols_download(ctx);
            Ok(ResponseBody::Ok)
        }
    }
}

/// `JumpToLine`/`JumpToAddress` carry no explicit thread — they reposition
/// the program counter of whichever thread is currently stopped. Resolving
/// "the" stopped thread from the registry's ephemeral table keeps the
/// handler itself free of engine-specific "current thread" bookkeeping.
fn primary_thread<W>(ctx: &SessionContext<W>) -> Result<adapter_core::id::ThreadId, AdapterError> {
    ctx.threads
        .lock()
        .keys()
        .next()
        .copied()
        .ok_or_else(|| AdapterError::not_found("no stopped thread"))
}

fn request_variant_name(body: &RequestBody) -> &'static str {
    match body {
        RequestBody::CreateTarget { .. } => "CreateTarget",
        RequestBody::Attach { .. } => "Attach",
        RequestBody::AttachByName { .. } => "AttachByName",
        RequestBody::LoadCore { .. } => "LoadCore",
        RequestBody::Launch { .. } => "Launch",
        RequestBody::Detach => "Detach",
        RequestBody::Kill => "Kill",
        RequestBody::Exit => "Exit",
        RequestBody::ConnectPlatform { .. } => "ConnectPlatform",
        RequestBody::ConnectProcess { .. } => "ConnectProcess",
        RequestBody::Continue => "Continue",
        RequestBody::Suspend => "Suspend",
        RequestBody::StepIn { .. } => "StepIn",
        RequestBody::StepOver { .. } => "StepOver",
        RequestBody::StepOut => "StepOut",
        RequestBody::StepScripted { .. } => "StepScripted",
        RequestBody::JumpToLine { .. } => "JumpToLine",
        RequestBody::JumpToAddress { .. } => "JumpToAddress",
        RequestBody::AddBreakpoint { .. } => "AddBreakpoint",
        RequestBody::RemoveBreakpoint { .. } => "RemoveBreakpoint",
        RequestBody::AddWatchpoint { .. } => "AddWatchpoint",
        RequestBody::RemoveWatchpoint { .. } => "RemoveWatchpoint",
        RequestBody::SetBreakpointCondition { .. } => "SetBreakpointCondition",
        RequestBody::SetBreakpointIgnoreCount { .. } => "SetBreakpointIgnoreCount",
        RequestBody::SetBreakpointEnabled { .. } => "SetBreakpointEnabled",
        RequestBody::SetBreakpointThreadRestriction { .. } => "SetBreakpointThreadRestriction",
        RequestBody::SetWatchpointEnabled { .. } => "SetWatchpointEnabled",
        RequestBody::GetThreads => "GetThreads",
        RequestBody::GetFrames { .. } => "GetFrames",
        RequestBody::FreezeThread { .. } => "FreezeThread",
        RequestBody::UnfreezeThread { .. } => "UnfreezeThread",
        RequestBody::Variables { .. } => "Variables",
        RequestBody::ValueChildren { .. } => "ValueChildren",
        RequestBody::ValueData { .. } => "ValueData",
        RequestBody::ValueDescription { .. } => "ValueDescription",
        RequestBody::ValueAddress { .. } => "ValueAddress",
        RequestBody::ChildrenCount { .. } => "ChildrenCount",
        RequestBody::ArraySlice { .. } => "ArraySlice",
        RequestBody::SetValueFilteringPolicy { .. } => "SetValueFilteringPolicy",
        RequestBody::Evaluate { .. } => "Evaluate",
        RequestBody::DumpMemory { .. } => "DumpMemory",
        RequestBody::WriteMemory { .. } => "WriteMemory",
        RequestBody::Disassemble { .. } => "Disassemble",
        RequestBody::DumpSections => "DumpSections",
        RequestBody::GetContextInfo => "GetContextInfo",
        RequestBody::GetRegisters { .. } => "GetRegisters",
        RequestBody::GetRegisterSets { .. } => "GetRegisterSets",
        RequestBody::GetArchitecture => "GetArchitecture",
        RequestBody::HandleConsoleCommand { .. } => "HandleConsoleCommand",
        RequestBody::HandleCompletion { .. } => "HandleCompletion",
        RequestBody::DispatchInput { .. } => "DispatchInput",
        RequestBody::ResizeConsole { .. } => "ResizeConsole",
        RequestBody::HandleSignal { .. } => "HandleSignal",
        RequestBody::ExecuteShellCommand { .. } => "ExecuteShellCommand",
        RequestBody::CancelSymbolsDownload => "CancelSymbolsDownload",
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
