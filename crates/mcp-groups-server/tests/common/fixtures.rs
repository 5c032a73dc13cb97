//! Test data fixtures for MCP server tests.

use std::sync::Arc;

use serde_json::{json, Value};

use mcp_groups_server::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, Meta, RequestId, MCP_VERSION,
};
use mcp_groups_server::{GroupServer, ProtocolHandler};

/// A server with the registry-backed handler installed.
pub fn create_test_server() -> Arc<GroupServer> {
    let server = GroupServer::new("test");
    server.use_registry_handler();
    Arc::new(server)
}

/// Send `initialize` followed by `notifications/initialized`; return the initialize response.
pub async fn init_handler(handler: &ProtocolHandler) -> Value {
    let init_req = JsonRpcRequest::new(
        RequestId::Number(0),
        "initialize",
        Some(json!({
            "protocolVersion": MCP_VERSION,
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "1.0"}
        })),
    );
    let response = handler
        .handle_message(JsonRpcMessage::Request(init_req))
        .await
        .expect("initialize must be answered");

    let init_notif = JsonRpcNotification::new("notifications/initialized", None);
    assert!(handler
        .handle_message(JsonRpcMessage::Notification(init_notif))
        .await
        .is_none());

    response
}

/// Send `groups/list` with the given params and return the raw response.
pub async fn list_groups(handler: &ProtocolHandler, params: Option<Value>) -> Value {
    let req = JsonRpcRequest::new(RequestId::Number(1), "groups/list", params);
    handler
        .handle_message(JsonRpcMessage::Request(req))
        .await
        .expect("groups/list must be answered")
}

/// Names from a successful `groups/list` response.
pub fn group_names(response: &Value) -> Vec<String> {
    response["result"]["groups"]
        .as_array()
        .expect("Expected groups array")
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect()
}

pub fn meta(value: Value) -> Meta {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected object"),
    }
}
