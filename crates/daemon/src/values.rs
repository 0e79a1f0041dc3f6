// SPDX-License-Identifier: MIT

//! Variable and expression-value inspection handlers: root variables, child
//! paging, raw data, descriptions, and addresses.

use adapter_core::error::AdapterError;
use adapter_core::id::{FrameId, ValueId};
use adapter_core::registry::ObjectKind;
use adapter_core::value::{
    ChildrenPage, DataEncoding as WireEncoding, FilterPolicy, KindMask, Value, ValueKind,
    CHILDREN_COUNT_UNKNOWN,
};
use adapter_engine::types::{DataEncoding as EngineEncoding, ValueInfo, ValueKindFilter};
use tokio::io::AsyncWrite;

use crate::context::SessionContext;
use crate::error::{engine_err, lookup_err};

fn to_filter(kind: ValueKind) -> ValueKindFilter {
    match kind {
        ValueKind::Locals => ValueKindFilter::Locals,
        ValueKind::Arguments => ValueKindFilter::Arguments,
        ValueKind::Statics => ValueKindFilter::Statics,
        ValueKind::Registers => ValueKindFilter::Registers,
    }
}

fn to_encoding(encoding: EngineEncoding) -> WireEncoding {
    match encoding {
        EngineEncoding::Integer => WireEncoding::Integer,
        EngineEncoding::Float => WireEncoding::Float,
        EngineEncoding::Utf8 => WireEncoding::Utf8,
        EngineEncoding::Bytes => WireEncoding::Bytes,
    }
}

fn to_value<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, info: ValueInfo) -> Value {
    let id = ValueId(ctx.registry.intern(ObjectKind::Value, info.handle));
    let children_count = info.children_count.map(i64::from).unwrap_or(CHILDREN_COUNT_UNKNOWN);
    let value = Value {
        id,
        name: info.name,
        type_name: info.type_name,
        summary: info.summary,
        raw_value: info.raw_value,
        children_count,
        has_more_children: children_count != 0,
        address: info.address,
    };
    ctx.values.lock().insert(id, value.clone());
    value
}

pub(crate) async fn variables<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    frame_id: FrameId,
    kind_mask: KindMask,
    filter_policy: Option<FilterPolicy>,
) -> Result<Vec<Value>, AdapterError> {
    ctx.session.require_stopped()?;
    let frame = ctx.registry.lookup(ObjectKind::Frame, frame_id.0).map_err(|e| lookup_err("frame", e))?;
    if let Some(policy) = filter_policy {
        *ctx.filter_policy.lock() = policy;
    }
    let filters: Vec<ValueKindFilter> = kind_mask.into_iter().map(to_filter).collect();
    let values = ctx.engine.list_values(frame, &filters).await.map_err(engine_err)?;
    Ok(values.into_iter().map(|info| to_value(ctx, info)).collect())
}

pub(crate) async fn children<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
    offset: usize,
    count: usize,
    max_children: usize,
) -> Result<ChildrenPage, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Value, value_id.0).map_err(|e| lookup_err("value", e))?;
    let capped = count.min(max_children);
    let fetched = ctx.engine.value_children(handle, offset, capped + 1).await.map_err(engine_err)?;
    let has_more = fetched.len() > capped;
    let values: Vec<ValueInfo> = fetched.into_iter().take(capped).collect();
    let children = values.into_iter().map(|info| to_value(ctx, info)).collect();
    Ok(ChildrenPage { children, has_more })
}

pub(crate) async fn array_slice<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
    offset: usize,
    count: usize,
) -> Result<Vec<Value>, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Value, value_id.0).map_err(|e| lookup_err("value", e))?;
    let fetched = ctx.engine.value_children(handle, offset, count).await.map_err(engine_err)?;
    Ok(fetched.into_iter().map(|info| to_value(ctx, info)).collect())
}

pub(crate) async fn data<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
) -> Result<(Vec<u8>, WireEncoding), AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Value, value_id.0).map_err(|e| lookup_err("value", e))?;
    let data = ctx.engine.value_data(handle).await.map_err(engine_err)?;
    Ok((data.bytes, to_encoding(data.encoding)))
}

pub(crate) async fn description<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
) -> Result<String, AdapterError> {
    let handle = ctx.registry.lookup(ObjectKind::Value, value_id.0).map_err(|e| lookup_err("value", e))?;
    ctx.engine.value_description(handle).await.map_err(engine_err)
}

pub(crate) fn address<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
) -> Result<Option<u64>, AdapterError> {
    ctx.values.lock().get(&value_id).map(|v| v.address).ok_or_else(|| AdapterError::not_found("value"))
}

pub(crate) fn children_count<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    value_id: ValueId,
) -> Result<i64, AdapterError> {
    ctx.values
        .lock()
        .get(&value_id)
        .map(|v| v.children_count)
        .ok_or_else(|| AdapterError::not_found("value"))
}

pub(crate) fn set_filtering_policy<W: AsyncWrite + Unpin + Send>(ctx: &SessionContext<W>, policy: FilterPolicy) {
    *ctx.filter_policy.lock() = policy;
}

pub(crate) async fn evaluate<W: AsyncWrite + Unpin + Send>(
    ctx: &SessionContext<W>,
    frame_id: FrameId,
    expression: String,
) -> Result<Value, AdapterError> {
    ctx.session.require_stopped()?;
    let frame = ctx.registry.lookup(ObjectKind::Frame, frame_id.0).map_err(|e| lookup_err("frame", e))?;
    let info = ctx.engine.evaluate(frame, &expression).await.map_err(engine_err)?;
    Ok(to_value(ctx, info))
}
