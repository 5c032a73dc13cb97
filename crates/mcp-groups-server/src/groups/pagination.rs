//! Cursor pagination over the group registry.

use std::sync::Arc;

use async_trait::async_trait;

use mcp_groups::GroupRegistry;

use super::handler::ListGroupsHandler;
use crate::types::{ListGroupsResult, ListParams, McpResult};

/// Serves the registry in pages of a fixed size.
///
/// The cursor names the first group of the next page, so a page boundary
/// survives additions and removals elsewhere in the registry. A cursor that
/// no longer matches any group restarts from the first page.
pub struct PagedRegistryHandler {
    registry: Arc<GroupRegistry>,
    page_size: usize,
}

impl PagedRegistryHandler {
    /// Page size is clamped to at least one.
    pub fn new(registry: Arc<GroupRegistry>, page_size: usize) -> Self {
        Self {
            registry,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[async_trait]
impl ListGroupsHandler for PagedRegistryHandler {
    async fn list_groups(&self, params: ListParams) -> McpResult<ListGroupsResult> {
        let snapshot = self.registry.list();

        let start = match params.cursor.as_deref() {
            None => 0,
            Some(cursor) => match snapshot.iter().position(|g| g.name == cursor) {
                Some(index) => index,
                None => {
                    tracing::debug!("Unknown groups/list cursor {cursor:?}, restarting");
                    0
                }
            },
        };

        let end = start.saturating_add(self.page_size).min(snapshot.len());
        let next_cursor = snapshot.get(end).map(|g| g.name.clone());
        let groups = snapshot
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();

        Ok(ListGroupsResult {
            groups,
            next_cursor,
        })
    }
}
