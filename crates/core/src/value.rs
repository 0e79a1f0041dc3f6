// SPDX-License-Identifier: MIT

//! Value (variable inspection) model.

use serde::{Deserialize, Serialize};

use crate::id::ValueId;

/// Which root-value categories a `Variables` request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Locals,
    Arguments,
    Statics,
    Registers,
}

/// Bitmask-equivalent set of [`ValueKind`]s. Modeled as a plain `Vec` (not a
/// bitflags type) since the wire payload carries it as a JSON array and the
/// set is always small.
pub type KindMask = Vec<ValueKind>;

/// Session-wide flags controlling which engine values are exposed. Defaults
/// to excluding everything optional, matching a conservative frontend
/// expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterPolicy {
    pub recognized_arguments: bool,
    pub runtime_support_values: bool,
    pub artificial_values: bool,
}

/// Sentinel for "children count unknown until fetched".
pub const CHILDREN_COUNT_UNKNOWN: i64 = -1;

/// A value-inspection node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub id: ValueId,
    pub name: String,
    pub type_name: String,
    pub summary: String,
    pub raw_value: String,
    /// `CHILDREN_COUNT_UNKNOWN` when cheap enumeration wasn't available.
    pub children_count: i64,
    pub has_more_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
}

/// A page of children returned by `ValueChildren`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildrenPage {
    pub children: Vec<Value>,
    pub has_more: bool,
}

/// Compute a children page from a full ordered child list, honoring the
/// offset/count/max_children paging rules: `count` is capped at
/// `max_children`, and `has_more` reports whether the capped window reached
/// the end of the list.
pub fn paginate(all_children: &[Value], offset: usize, count: usize, max_children: usize) -> ChildrenPage {
    let total = all_children.len();
    if offset >= total {
        return ChildrenPage { children: Vec::new(), has_more: false };
    }
    let capped_count = count.min(max_children);
    let end = (offset + capped_count).min(total);
    let children = all_children[offset..end].to_vec();
    let has_more = end < total;
    ChildrenPage { children, has_more }
}

/// Raw-bytes encoding tag for `ValueData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataEncoding {
    Integer,
    Float,
    Utf8,
    Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueData {
    pub bytes: Vec<u8>,
    pub encoding: DataEncoding,
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
