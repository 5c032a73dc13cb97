//! MCP response payloads.

use serde::{Deserialize, Serialize};

use mcp_groups::Group;

/// Result from groups/list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListGroupsResult {
    /// Groups on this page, in registry order.
    pub groups: Vec<Group>,
    /// Cursor for the next page; absent on the last page.
    #[serde(
        default,
        rename = "nextCursor",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_cursor: Option<String>,
}

impl ListGroupsResult {
    /// A single, final page.
    pub fn complete(groups: Vec<Group>) -> Self {
        Self {
            groups,
            next_cursor: None,
        }
    }
}

/// Wrap a full group set as a single, final page.
impl From<Vec<Group>> for ListGroupsResult {
    fn from(groups: Vec<Group>) -> Self {
        Self::complete(groups)
    }
}

/// Empty result, used for ping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyResult {}
