//! Stress tests: large registries, paging, and deep hierarchies.
//!
//! Tests verify that a config-seeded server pages through 10K groups without
//! loss or repetition, and that long parent chains survive listing intact.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use mcp_groups::{group_memberships, Group, Meta, GROUPS_META_KEY};
use mcp_groups_server::config::load_config;
use mcp_groups_server::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, RequestId, MCP_VERSION,
};
use mcp_groups_server::{GroupServer, ProtocolHandler};
use serde_json::{json, Value};
use tempfile::tempdir;

// ─── Helpers ───────────────────────────────────────────────────────────────

async fn init_handler(handler: &ProtocolHandler) {
    let init_req = JsonRpcRequest::new(
        RequestId::Number(0),
        "initialize",
        Some(json!({
            "protocolVersion": MCP_VERSION,
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "1.0"}
        })),
    );
    handler
        .handle_message(JsonRpcMessage::Request(init_req))
        .await;

    let init_notif = JsonRpcNotification::new("notifications/initialized", None);
    handler
        .handle_message(JsonRpcMessage::Notification(init_notif))
        .await;
}

async fn list_page(handler: &ProtocolHandler, cursor: Option<&str>) -> Value {
    let params = cursor.map(|c| json!({ "cursor": c }));
    let req = JsonRpcRequest::new(RequestId::Number(1), "groups/list", params);
    handler
        .handle_message(JsonRpcMessage::Request(req))
        .await
        .unwrap()
}

fn parents(names: &[&str]) -> Meta {
    let mut meta = Meta::new();
    meta.insert(GROUPS_META_KEY.to_string(), json!(names));
    meta
}

// ─── Tests ─────────────────────────────────────────────────────────────────

/// 10K groups seeded from a config file, paged over the protocol
#[tokio::test]
async fn test_10k_groups_paged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("groups.toml");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[groups]\npage_size = 500\n").unwrap();
        for i in 0..10_000u32 {
            writeln!(file, "[[groups.seed]]\nname = \"group-{i:05}\"\n").unwrap();
        }
    }

    let start = Instant::now();
    let config = load_config(path.to_str()).unwrap();
    let server = Arc::new(GroupServer::from_config(&config).unwrap());
    println!("Seed 10K groups from config: {:?}", start.elapsed());
    assert_eq!(server.registry().len(), 10_000);

    let handler = ProtocolHandler::new(server);
    init_handler(&handler).await;

    let start = Instant::now();
    let mut seen: Vec<String> = Vec::with_capacity(10_000);
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let response = list_page(&handler, cursor.as_deref()).await;
        let groups = response["result"]["groups"].as_array().unwrap();
        assert!(groups.len() <= 500);
        seen.extend(
            groups
                .iter()
                .map(|g| g["name"].as_str().unwrap().to_string()),
        );
        pages += 1;
        match response["result"]["nextCursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }
    println!("Page through 10K groups: {:?}", start.elapsed());

    assert_eq!(pages, 20);
    assert_eq!(seen.len(), 10_000);
    assert_eq!(seen.first().map(String::as_str), Some("group-00000"));
    assert_eq!(seen.last().map(String::as_str), Some("group-09999"));
    assert!(seen.windows(2).all(|w| w[0] < w[1]), "No repeats, order kept");
}

/// A 100-deep parent chain, walked back to the root from listed records
#[tokio::test]
async fn test_deep_hierarchy() {
    let server = GroupServer::new("bridge");
    server.use_registry_handler();
    let server = Arc::new(server);

    server.add_group(Group::new("level-0")).unwrap();
    for i in 1..100 {
        let parent = format!("level-{}", i - 1);
        server
            .add_group(Group::new(format!("level-{i}")).with_meta(parents(&[parent.as_str()])))
            .unwrap();
    }

    let handler = ProtocolHandler::new(Arc::clone(&server));
    init_handler(&handler).await;
    let response = list_page(&handler, None).await;
    let listed: Vec<Group> =
        serde_json::from_value(response["result"]["groups"].clone()).unwrap();
    assert_eq!(listed.len(), 100);

    let start = Instant::now();
    let mut current = listed.last().unwrap().clone();
    let mut depth = 0;
    while let Some(parent) = group_memberships(current.meta.as_ref())
        .first()
        .map(|p| p.to_string())
    {
        current = listed
            .iter()
            .find(|g| g.name == parent)
            .expect("Parent should be listed")
            .clone();
        depth += 1;
    }
    println!("Walk 100-level chain: {:?}", start.elapsed());

    assert_eq!(depth, 99);
    assert_eq!(current.name, "level-0");
}
