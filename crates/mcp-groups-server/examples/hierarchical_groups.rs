//! Example: Hierarchical groups served in-process.
//!
//! Builds a server with a small group tree, negotiates a session, lists the
//! groups over JSON-RPC, and prints the tree reconstructed from `_meta`.
//!
//! Usage:
//!   cargo run --example hierarchical_groups

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc;

use mcp_groups::{group_memberships, Group, Meta, GROUPS_META_KEY};
use mcp_groups_server::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, NotificationOptions, RequestId,
    MCP_VERSION,
};
use mcp_groups_server::{GroupServer, ProtocolHandler};

fn child_of(parent: &str) -> Meta {
    let mut meta = Meta::new();
    meta.insert(GROUPS_META_KEY.to_string(), json!([parent]));
    meta
}

async fn request(handler: &ProtocolHandler, id: i64, method: &str, params: Option<Value>) -> Value {
    let req = JsonRpcRequest::new(RequestId::Number(id), method, params);
    handler
        .handle_message(JsonRpcMessage::Request(req))
        .await
        .unwrap_or(Value::Null)
}

fn print_tree(groups: &[Group], parent: Option<&str>, depth: usize) {
    for group in groups {
        let parents = group_memberships(group.meta.as_ref());
        let matches = match parent {
            None => parents.is_empty(),
            Some(p) => parents.contains(&p),
        };
        if matches {
            let title = group.title.as_deref().unwrap_or(&group.name);
            println!("   {}- {} ({})", "  ".repeat(depth), title, group.name);
            print_tree(groups, Some(group.name.as_str()), depth + 1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== MCP Groups Example ===\n");

    let server = GroupServer::new("example-groups").with_notification_options(
        NotificationOptions {
            groups_changed: true,
        },
    );
    server.use_registry_handler();
    let server = Arc::new(server);

    // 1. Register a tree
    println!("1. Registering groups...");
    server.add_group(Group::new("communications").with_title("Communications"))?;
    server.add_group(
        Group::new("email")
            .with_title("Email")
            .with_meta(child_of("communications")),
    )?;
    server.add_group(
        Group::new("chat")
            .with_title("Chat")
            .with_meta(child_of("communications")),
    )?;
    server.add_group(
        Group::new("spam-filters")
            .with_description("Rules applied to incoming mail")
            .with_meta(child_of("email")),
    )?;
    println!("   {} groups registered", server.list_groups().len());

    // 2. Negotiate a session
    println!("\n2. Initializing session...");
    let (tx, mut rx) = mpsc::channel::<JsonRpcNotification>(8);
    let handler = ProtocolHandler::with_notifications(Arc::clone(&server), tx);
    let init = request(
        &handler,
        1,
        "initialize",
        Some(json!({
            "protocolVersion": MCP_VERSION,
            "capabilities": {},
            "clientInfo": {"name": "example-client", "version": "1.0.0"}
        })),
    )
    .await;
    println!("   Capabilities: {}", init["result"]["capabilities"]);

    // 3. List and rebuild the tree
    println!("\n3. Listing groups...");
    let listed = request(&handler, 2, "groups/list", None).await;
    let groups: Vec<Group> = serde_json::from_value(listed["result"]["groups"].clone())?;
    print_tree(&groups, None, 0);

    // 4. Change the set and observe the notification
    println!("\n4. Removing 'communications'...");
    server.remove_group("communications");
    if let Some(notification) = rx.recv().await {
        println!("   Received {}", notification.method);
    }
    let listed = request(&handler, 3, "groups/list", None).await;
    let groups: Vec<Group> = serde_json::from_value(listed["result"]["groups"].clone())?;
    println!("   {} groups remain; orphans keep their parent reference:", groups.len());
    for group in &groups {
        println!(
            "   - {} -> {:?}",
            group.name,
            group_memberships(group.meta.as_ref())
        );
    }

    println!("\n=== Example complete ===");
    Ok(())
}
