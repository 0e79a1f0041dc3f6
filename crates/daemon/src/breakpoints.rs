// SPDX-License-Identifier: MIT

//! Breakpoint and watchpoint lifecycle handlers: create, resolve, update,
//! and remove, mirroring every change back to the frontend as an event.

use adapter_core::breakpoint::{Breakpoint, BreakpointSpec, Location, SourceLocation, Watchpoint, WatchpointAccess};
use adapter_core::error::AdapterError;
use adapter_core::id::{BreakpointId, LocationId, WatchpointId};
use adapter_core::registry::{ObjectKind, Registry};
use adapter_engine::types::ResolvedLocation;
use adapter_wire::Event;
use tokio::io::AsyncWrite;

use crate::context::SessionContext;
use crate::error::{engine_err, lookup_err};

/// Turn an engine-reported location into a registry-backed protocol one,
/// assigning a fresh `location_id`.
pub(crate) fn intern_location(registry: &Registry, rl: &ResolvedLocation) -> Location {
    let location_id = LocationId(registry.intern(ObjectKind::Location, rl.handle));
    let source_location = rl.file_path.clone().map(|file_path| SourceLocation {
        file_path,
        line: rl.line.unwrap_or(0),
        column: None,
    });
    Location { location_id, address: rl.address, resolved: true, source_location }
}

pub(crate) async fn add_breakpoint<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    spec: BreakpointSpec,
    condition: Option<String>,
    ignore_count: u32,
) -> Result<Breakpoint, AdapterError> {
    spec.validate()?;
    let target = ctx.session.require_target()?;

    let resolution = ctx.engine.create_breakpoint(target, &spec).await.map_err(engine_err)?;
    let id = BreakpointId(ctx.registry.intern(ObjectKind::Breakpoint, resolution.handle));
    let locations: Vec<Location> =
        resolution.locations.iter().map(|rl| intern_location(&ctx.registry, rl)).collect();

    let mut breakpoint = Breakpoint::new(id, spec);
    breakpoint.locations = locations;

    if condition.is_some() {
        ctx.engine
            .set_breakpoint_condition(resolution.handle, condition.as_deref())
            .await
            .map_err(engine_err)?;
        breakpoint.condition = condition;
    }
    if ignore_count > 0 {
        ctx.engine.set_breakpoint_ignore_count(resolution.handle, ignore_count).await.map_err(engine_err)?;
        breakpoint.ignore_count = ignore_count;
    }

    ctx.breakpoints.lock().insert(id, breakpoint.clone());
    let _ = ctx.send_frame(&Event::BreakpointAdded { breakpoint: breakpoint.clone() }).await;
    Ok(breakpoint)
}

pub(crate) async fn remove_breakpoint<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: BreakpointId,
) -> Result<(), AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Breakpoint, id.0).map_err(|e| lookup_err("breakpoint", e))?;
    ctx.engine.delete_breakpoint(handle).await.map_err(engine_err)?;
    ctx.registry.forget(ObjectKind::Breakpoint, id.0);
    ctx.breakpoints.lock().remove(&id);
    let _ = ctx.send_frame(&Event::BreakpointRemoved { id }).await;
    Ok(())
}

pub(crate) async fn set_condition<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: BreakpointId,
    condition: Option<String>,
) -> Result<Breakpoint, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Breakpoint, id.0).map_err(|e| lookup_err("breakpoint", e))?;
    ctx.engine.set_breakpoint_condition(handle, condition.as_deref()).await.map_err(engine_err)?;
    let mut guard = ctx.breakpoints.lock();
    let bp = guard.get_mut(&id).ok_or_else(|| AdapterError::not_found("breakpoint"))?;
    bp.condition = condition;
    let snapshot = bp.clone();
    drop(guard);
    let _ = ctx.send_frame(&Event::BreakpointChanged { breakpoint: snapshot.clone() }).await;
    Ok(snapshot)
}

pub(crate) async fn set_ignore_count<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: BreakpointId,
    ignore_count: u32,
) -> Result<Breakpoint, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Breakpoint, id.0).map_err(|e| lookup_err("breakpoint", e))?;
    ctx.engine.set_breakpoint_ignore_count(handle, ignore_count).await.map_err(engine_err)?;
    let mut guard = ctx.breakpoints.lock();
    let bp = guard.get_mut(&id).ok_or_else(|| AdapterError::not_found("breakpoint"))?;
    bp.ignore_count = ignore_count;
    let snapshot = bp.clone();
    drop(guard);
    let _ = ctx.send_frame(&Event::BreakpointChanged { breakpoint: snapshot.clone() }).await;
    Ok(snapshot)
}

pub(crate) async fn set_enabled<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: BreakpointId,
    enabled: bool,
) -> Result<Breakpoint, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Breakpoint, id.0).map_err(|e| lookup_err("breakpoint", e))?;
    ctx.engine.set_breakpoint_enabled(handle, enabled).await.map_err(engine_err)?;
    let mut guard = ctx.breakpoints.lock();
    let bp = guard.get_mut(&id).ok_or_else(|| AdapterError::not_found("breakpoint"))?;
    bp.enabled = enabled;
    let snapshot = bp.clone();
    drop(guard);
    let _ = ctx.send_frame(&Event::BreakpointChanged { breakpoint: snapshot.clone() }).await;
    Ok(snapshot)
}

pub(crate) async fn set_thread_restriction<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: BreakpointId,
    thread_id: Option<u64>,
) -> Result<Breakpoint, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Breakpoint, id.0).map_err(|e| lookup_err("breakpoint", e))?;
    ctx.engine.set_breakpoint_thread_restriction(handle, thread_id).await.map_err(engine_err)?;
    let mut guard = ctx.breakpoints.lock();
    let bp = guard.get_mut(&id).ok_or_else(|| AdapterError::not_found("breakpoint"))?;
    bp.thread_restriction = thread_id;
    let snapshot = bp.clone();
    drop(guard);
    let _ = ctx.send_frame(&Event::BreakpointChanged { breakpoint: snapshot.clone() }).await;
    Ok(snapshot)
}

pub(crate) async fn add_watchpoint<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    address: u64,
    size_bytes: u32,
    read: bool,
    write: bool,
) -> Result<Watchpoint, AdapterError> {
    Watchpoint::validate_size(size_bytes)?;
    let target = ctx.session.require_target()?;
    let handle = ctx.engine.create_watchpoint(target, address, size_bytes, read, write).await.map_err(engine_err)?;
    let id = WatchpointId(ctx.registry.intern(ObjectKind::Watchpoint, handle));
    let watchpoint = Watchpoint {
        id,
        address,
        size_bytes,
        access: WatchpointAccess { read, write },
        enabled: true,
        hit_count: 0,
    };
    ctx.watchpoints.lock().insert(id, watchpoint.clone());
    let _ = ctx.send_frame(&Event::WatchpointAdded { watchpoint: watchpoint.clone() }).await;
    Ok(watchpoint)
}

pub(crate) async fn remove_watchpoint<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: WatchpointId,
) -> Result<(), AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Watchpoint, id.0).map_err(|e| lookup_err("watchpoint", e))?;
    ctx.engine.delete_watchpoint(handle).await.map_err(engine_err)?;
    ctx.registry.forget(ObjectKind::Watchpoint, id.0);
    ctx.watchpoints.lock().remove(&id);
    let _ = ctx.send_frame(&Event::WatchpointRemoved { id }).await;
    Ok(())
}

pub(crate) async fn set_watchpoint_enabled<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    id: WatchpointId,
    enabled: bool,
) -> Result<Watchpoint, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Watchpoint, id.0).map_err(|e| lookup_err("watchpoint", e))?;
    ctx.engine.set_watchpoint_enabled(handle, enabled).await.map_err(engine_err)?;
    let mut guard = ctx.watchpoints.lock();
    let wp = guard.get_mut(&id).ok_or_else(|| AdapterError::not_found("watchpoint"))?;
    wp.enabled = enabled;
    let snapshot = wp.clone();
    drop(guard);
    let _ = ctx.send_frame(&Event::WatchpointChanged { watchpoint: snapshot.clone() }).await;
    Ok(snapshot)
}
