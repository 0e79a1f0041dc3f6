// SPDX-License-Identifier: MIT

//! Memory, disassembly, and register handlers.

use std::collections::HashMap;

use adapter_core::error::AdapterError;
use adapter_core::id::ThreadId;
use adapter_core::registry::ObjectKind;
use tokio::io::AsyncWrite;

use crate::context::SessionContext;
use crate::error::{engine_err, lookup_err};

pub(crate) async fn dump_memory<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    address: u64,
    length: u64,
) -> Result<Vec<u8>, AdapterError> {
    let process = ctx.session.require_process()?;
    ctx.engine.read_memory(process, address, length).await.map_err(engine_err)
}

pub(crate) async fn write_memory<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    address: u64,
    bytes: Vec<u8>,
) -> Result<u64, AdapterError> {
    let process = ctx.session.require_process()?;
    ctx.engine.write_memory(process, address, &bytes).await.map_err(engine_err)
}

pub(crate) async fn disassemble<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    address: u64,
    byte_count: Option<u64>,
    instruction_count: Option<u64>,
) -> Result<Vec<String>, AdapterError> {
    let process = ctx.session.require_process()?;
    ctx.engine.disassemble(process, address, byte_count, instruction_count).await.map_err(engine_err)
}

pub(crate) async fn dump_sections<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
) -> Result<Vec<String>, AdapterError> {
    let target = ctx.session.require_target()?;
    let modules = ctx.engine.list_modules(target).await.map_err(engine_err)?;
    Ok(modules.into_iter().map(|m| m.path).collect())
}

pub(crate) async fn get_context_info<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
) -> Result<String, AdapterError> {
    let state = ctx.session.state();
    let target = ctx.session.current_target().is_some();
    Ok(format!("state={state} target={target}"))
}

pub(crate) async fn get_registers<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    thread_id: ThreadId,
    group_names: Option<Vec<String>>,
    register_names: Option<Vec<String>>,
) -> Result<HashMap<String, u64>, AdapterError> {
    ctx.session.require_stopped()?;
    let handle =
        ctx.registry.lookup(ObjectKind::Thread, thread_id.0).map_err(|e| lookup_err("thread", e))?;
    let regs = ctx
        .engine
        .read_registers(handle, group_names.as_deref(), register_names.as_deref())
        .await
        .map_err(engine_err)?;
    Ok(regs.into_iter().collect())
}

pub(crate) async fn get_register_sets<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    thread_id: ThreadId,
) -> Result<Vec<String>, AdapterError> {
    ctx.session.require_stopped()?;
    let handle =
        ctx.registry.lookup(ObjectKind::Thread, thread_id.0).map_err(|e| lookup_err("thread", e))?;
    let regs = ctx.engine.read_registers(handle, None, None).await.map_err(engine_err)?;
    Ok(regs.into_iter().map(|(name, _)| name).collect())
}

pub(crate) async fn get_architecture<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
) -> Result<String, AdapterError> {
    ctx.session.require_target()?;
    Ok(std::env::consts::ARCH.to_string())
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
