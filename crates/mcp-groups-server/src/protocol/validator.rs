//! Request envelope checks and parameter parsing.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{JsonRpcRequest, ListParams, McpError, McpResult, JSONRPC_VERSION};

/// Check the JSON-RPC envelope of an incoming request.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "Unsupported jsonrpc version '{}'",
            request.jsonrpc
        )));
    }
    if request.method.is_empty() {
        return Err(McpError::InvalidRequest("Empty method name".to_string()));
    }
    Ok(())
}

/// Parse required params strictly.
pub fn parse_params<T: DeserializeOwned>(method: &str, params: Option<&Value>) -> McpResult<T> {
    let params =
        params.ok_or_else(|| McpError::InvalidParams(format!("Missing params for {method}")))?;
    serde_json::from_value(params.clone())
        .map_err(|e| McpError::InvalidParams(format!("Invalid {method} params: {e}")))
}

/// Parse list params leniently.
///
/// Anything that is not a string cursor is treated as "no cursor", so a
/// malformed request simply restarts from the first page.
pub fn list_params(params: Option<&Value>) -> ListParams {
    let cursor = params.and_then(|p| p.get("cursor"));
    match cursor {
        None | Some(Value::Null) => ListParams::default(),
        Some(Value::String(s)) => ListParams::with_cursor(s.clone()),
        Some(other) => {
            tracing::debug!("Ignoring non-string cursor {other}");
            ListParams::default()
        }
    }
}
