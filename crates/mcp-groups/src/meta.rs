//! Metadata conventions shared by groups and other MCP primitives.

use serde_json::{Map, Value};

/// `_meta` key under which a primitive lists the groups it belongs to.
///
/// The value is an ordered array of group names. The registry never reads it.
pub const GROUPS_META_KEY: &str = "io.modelcontextprotocol/groups";

/// Free-form `_meta` mapping attached to a group.
pub type Meta = Map<String, Value>;

/// Read the group names listed under [`GROUPS_META_KEY`].
///
/// For application code that wants to walk the hierarchy. Entries that are
/// not strings are skipped; a missing key or non-array value yields an empty
/// list. Whether the named groups exist is not checked.
pub fn group_memberships(meta: Option<&Meta>) -> Vec<&str> {
    meta.and_then(|m| m.get(GROUPS_META_KEY))
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
