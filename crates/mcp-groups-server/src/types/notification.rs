//! Server-to-client notification methods and payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{JsonRpcNotification, RequestId};

/// Sent when the set of groups offered by the server changes. Carries no params.
pub const GROUPS_LIST_CHANGED: &str = "notifications/groups/list_changed";

/// Client notification completing the handshake.
pub const INITIALIZED: &str = "notifications/initialized";

/// Older clients send the bare form.
pub const INITIALIZED_LEGACY: &str = "initialized";

/// Client notification cancelling an in-flight request.
pub const CANCELLED: &str = "notifications/cancelled";

/// Build the zero-payload groups list-changed notification.
pub fn groups_list_changed() -> JsonRpcNotification {
    JsonRpcNotification::new(GROUPS_LIST_CHANGED, None)
}

/// Params of notifications/cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    /// The request being cancelled.
    pub request_id: RequestId,
    /// Optional reason for cancellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelledParams {
    /// Parse from raw notification params, if well formed.
    pub fn from_params(params: Option<&Value>) -> Option<Self> {
        params.and_then(|p| serde_json::from_value(p.clone()).ok())
    }
}
