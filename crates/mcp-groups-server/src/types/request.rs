//! MCP request method names and parameter types.

use serde::{Deserialize, Serialize};

/// Handshake request.
pub const INITIALIZE: &str = "initialize";
/// Liveness check, allowed before initialization.
pub const PING: &str = "ping";
/// List the groups the server offers.
pub const GROUPS_LIST: &str = "groups/list";

/// Cursor-based pagination for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Opaque cursor returned as `nextCursor` by a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl ListParams {
    pub fn with_cursor(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
        }
    }
}
