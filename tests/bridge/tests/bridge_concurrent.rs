//! Concurrent access: several sessions listing while the registry changes.
//!
//! Tests verify that concurrent readers always observe a consistent snapshot,
//! that racing duplicate registrations leave exactly one record, and that
//! every session sees mutations made through the shared server.

use std::sync::Arc;
use tokio::sync::Barrier;

use mcp_groups::Group;
use mcp_groups_server::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, RequestId, MCP_VERSION,
};
use mcp_groups_server::{GroupServer, ProtocolHandler};
use serde_json::json;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn create_server() -> Arc<GroupServer> {
    let server = GroupServer::new("bridge");
    server.use_registry_handler();
    Arc::new(server)
}

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

async fn list_names(handler: &ProtocolHandler) -> Vec<String> {
    let req = JsonRpcRequest::new(RequestId::Number(1), "groups/list", None);
    let response = handler
        .handle_message(JsonRpcMessage::Request(req))
        .await
        .unwrap();
    response["result"]["groups"]
        .as_array()
        .expect("Expected groups array")
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect()
}

// ─── Tests ─────────────────────────────────────────────────────────────────

/// Multiple readers, no writers
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers() {
    let server = create_server();
    for i in 0..100 {
        server.add_group(Group::new(format!("group-{i}"))).unwrap();
    }

    let barrier = Arc::new(Barrier::new(5));
    let mut handles = vec![];

    for session_num in 0..5u32 {
        let server = Arc::clone(&server);
        let barrier = Arc::clone(&barrier);

        handles.push(tokio::spawn(async move {
            let handler = ProtocolHandler::new(server);
            init_handler(&handler).await;
            barrier.wait().await;

            let names = list_names(&handler).await;
            assert_eq!(
                names.len(),
                100,
                "Session {} should see all 100 groups",
                session_num
            );
            assert_eq!(names[0], "group-0");
            assert_eq!(names[99], "group-99");
            session_num
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

/// Listing while a writer appends: every response is a prefix of the final order
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_list_during_registration() {
    let server = create_server();
    let barrier = Arc::new(Barrier::new(4));

    let writer = {
        let server = Arc::clone(&server);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            for i in 0..300 {
                server.add_group(Group::new(format!("g{i}"))).unwrap();
                if i % 25 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..3 {
        let server = Arc::clone(&server);
        let barrier = Arc::clone(&barrier);
        readers.push(tokio::spawn(async move {
            let handler = ProtocolHandler::new(server);
            init_handler(&handler).await;
            barrier.wait().await;

            for _ in 0..50 {
                let names = list_names(&handler).await;
                let expected: Vec<String> = (0..names.len()).map(|i| format!("g{i}")).collect();
                assert_eq!(names, expected, "Snapshot must be an ordered prefix");
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(server.list_groups().len(), 300);
}

/// Racing registrations of one name keep exactly one record
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_duplicates() {
    let server = create_server();
    let barrier = Arc::new(Barrier::new(8));
    let mut handles = vec![];

    for i in 0..8u32 {
        let server = Arc::clone(&server);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            server
                .add_group(Group::new("contested").with_title(format!("writer {i}")))
                .unwrap()
        }));
    }

    let mut returned = vec![];
    for handle in handles {
        returned.push(handle.await.unwrap());
    }

    let stored = server.get_group("contested").unwrap();
    assert_eq!(server.list_groups().len(), 1);
    assert!(
        returned.iter().all(|g| *g == stored),
        "Every caller must get the winning record"
    );
}

/// Mutations through the server are visible to sessions that negotiated earlier
#[tokio::test]
async fn test_sessions_share_registry() {
    let server = create_server();
    let early = ProtocolHandler::new(Arc::clone(&server));
    init_handler(&early).await;

    server.add_group(Group::new("parent")).unwrap();
    let late = ProtocolHandler::new(Arc::clone(&server));
    init_handler(&late).await;

    assert_eq!(list_names(&early).await, vec!["parent"]);
    assert_eq!(list_names(&late).await, vec!["parent"]);

    server.remove_group("parent");
    assert!(list_names(&early).await.is_empty());
    assert!(list_names(&late).await.is_empty());
}
