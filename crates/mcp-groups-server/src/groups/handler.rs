//! The `groups/list` handler contract and its adapters.
//!
//! Every handler is reduced to one shape, `ListParams -> ListGroupsResult`.
//! Handlers that do not page are wrapped so they ignore the cursor and never
//! return a `nextCursor`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use mcp_groups::{Group, GroupRegistry};

use crate::types::{ListGroupsResult, ListParams, McpResult};

/// Answers `groups/list` requests for one server.
#[async_trait]
pub trait ListGroupsHandler: Send + Sync {
    /// Produce one page of groups for the given request.
    async fn list_groups(&self, params: ListParams) -> McpResult<ListGroupsResult>;
}

/// Adapter for handlers that always return the whole set.
pub struct IgnoreCursor<F>(F);

impl<F> IgnoreCursor<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ListGroupsHandler for IgnoreCursor<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<Group>> + Send + 'static,
{
    async fn list_groups(&self, _params: ListParams) -> McpResult<ListGroupsResult> {
        Ok((self.0)().await.into())
    }
}

/// Adapter for handlers that see the request and may return a next cursor.
pub struct WithRequest<F>(F);

impl<F> WithRequest<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ListGroupsHandler for WithRequest<F>
where
    F: Fn(ListParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ListGroupsResult> + Send + 'static,
{
    async fn list_groups(&self, params: ListParams) -> McpResult<ListGroupsResult> {
        Ok((self.0)(params).await)
    }
}

/// Default handler: the whole registry as a single page.
pub struct RegistryHandler {
    registry: Arc<GroupRegistry>,
}

impl RegistryHandler {
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ListGroupsHandler for RegistryHandler {
    async fn list_groups(&self, _params: ListParams) -> McpResult<ListGroupsResult> {
        Ok(ListGroupsResult::complete(self.registry.list()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ignore_cursor_never_pages() {
        let handler = IgnoreCursor::new(|| async {
            vec![Group::new("g1").with_title("Group 1"), Group::new("g2")]
        });

        let result = handler
            .list_groups(ListParams::with_cursor("page2"))
            .await
            .unwrap();
        assert_eq!(result.groups.len(), 2);
        assert!(result.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_with_request_sees_cursor() {
        let handler = WithRequest::new(|params: ListParams| async move {
            ListGroupsResult {
                groups: vec![Group::new("test")
                    .with_description(format!("cursor={:?}", params.cursor))],
                next_cursor: Some("next".to_string()),
            }
        });

        let result = handler
            .list_groups(ListParams::with_cursor("page2"))
            .await
            .unwrap();
        assert_eq!(
            result.groups[0].description.as_deref(),
            Some("cursor=Some(\"page2\")")
        );
        assert_eq!(result.next_cursor.as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn test_registry_handler_single_page() {
        let registry = Arc::new(GroupRegistry::new());
        registry.add(Group::new("A")).unwrap();
        registry.add(Group::new("B")).unwrap();

        let result = RegistryHandler::new(registry)
            .list_groups(ListParams::default())
            .await
            .unwrap();
        let names: Vec<_> = result.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(result.next_cursor.is_none());
    }

    #[test]
    fn test_group_vec_converts_to_final_page() {
        let result: ListGroupsResult = vec![Group::new("only")].into();
        assert_eq!(result.groups.len(), 1);
        assert!(result.next_cursor.is_none());
    }
}
