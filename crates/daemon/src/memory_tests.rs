// SPDX-License-Identifier: MIT

use std::sync::Arc;

use adapter_core::id::ThreadId;
use adapter_core::registry::ObjectKind;
use adapter_engine::NullEngine;
use tokio::io::DuplexStream;

use super::*;
use crate::context::SessionContext;

fn ctx() -> Arc<SessionContext<DuplexStream>> {
    let (_client, server) = tokio::io::duplex(8192);
    Arc::new(SessionContext::new(Arc::new(NullEngine::new()), server, 1024 * 1024))
}

async fn with_process(ctx: &SessionContext<DuplexStream>) {
    let target = ctx.engine.create_target("a.out").await.unwrap();
    ctx.session.create_target(target);
    ctx.session.begin_launch().unwrap();
    let process = ctx.engine.launch(target, Default::default()).await.unwrap();
    ctx.session.launch_settled(process, true);
}

#[tokio::test]
async fn dump_memory_requires_a_process() {
    let ctx = ctx();
    let err = dump_memory(&ctx, 0x1000, 16).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NoProcess);
}

#[tokio::test]
async fn dump_memory_returns_requested_length() {
    let ctx = ctx();
    with_process(&ctx).await;
    let bytes = dump_memory(&ctx, 0x1000, 16).await.unwrap();
    assert_eq!(bytes.len(), 16);
}

#[tokio::test]
async fn write_memory_reports_bytes_written() {
    let ctx = ctx();
    with_process(&ctx).await;
    let written = write_memory(&ctx, 0x2000, vec![1, 2, 3, 4]).await.unwrap();
    assert_eq!(written, 4);
}

#[tokio::test]
async fn disassemble_labels_the_requested_address() {
    let ctx = ctx();
    with_process(&ctx).await;
    let lines = disassemble(&ctx, 0x401000, Some(16), None).await.unwrap();
    assert!(lines[0].contains("401000"));
}

#[tokio::test]
async fn dump_sections_lists_loaded_module_paths() {
    let ctx = ctx();
    let target = ctx.engine.create_target("a.out").await.unwrap();
    ctx.session.create_target(target);
    let sections = dump_sections(&ctx).await.unwrap();
    assert!(sections.is_empty());
}

#[tokio::test]
async fn get_context_info_reflects_session_state() {
    let ctx = ctx();
    let summary = get_context_info(&ctx).await.unwrap();
    assert!(summary.contains("UNINITIALIZED"));
}

#[tokio::test]
async fn get_registers_requires_a_stopped_thread() {
    let ctx = ctx();
    with_process(&ctx).await;
    let handle = ctx.engine.list_threads(ctx.session.current_process().unwrap()).await.unwrap()[0].handle;
    let thread_id = ThreadId(ctx.registry.intern(ObjectKind::Thread, handle));
    let regs = get_registers(&ctx, thread_id, None, None).await.unwrap();
    assert!(regs.contains_key("pc"));
}

#[tokio::test]
async fn get_registers_rejects_an_unknown_thread_id() {
    let ctx = ctx();
    with_process(&ctx).await;
    let err = get_registers(&ctx, ThreadId(999), None, None).await.unwrap_err();
    assert_eq!(err.kind, adapter_core::error::ErrorKind::NotFound);
}

#[tokio::test]
async fn get_architecture_requires_a_target() {
    let ctx = ctx();
    assert!(get_architecture(&ctx).await.is_err());
    let target = ctx.engine.create_target("a.out").await.unwrap();
    ctx.session.create_target(target);
    assert!(get_architecture(&ctx).await.is_ok());
}
