//! The group server: registry, list handler slot, and capability table.
//!
//! One `GroupServer` is shared (via `Arc`) by the application code that
//! registers groups and by every session's [`ProtocolHandler`]. It never
//! performs I/O.
//!
//! [`ProtocolHandler`]: crate::protocol::ProtocolHandler

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use mcp_groups::{Group, GroupRegistry};

use crate::config::ServerConfig;
use crate::groups::{
    IgnoreCursor, ListChangedNotifier, ListGroupsHandler, PagedRegistryHandler, RegistryHandler,
    WithRequest,
};
use crate::types::{
    GroupsCapability, Implementation, InitializeResult, ListGroupsResult, ListParams, McpError,
    McpResult, NotificationOptions, ServerCapabilities, GROUPS_LIST,
};

/// Server-side owner of the group registry and the `groups/list` handler.
pub struct GroupServer {
    info: Implementation,
    instructions: Option<String>,
    registry: Arc<GroupRegistry>,
    list_handler: RwLock<Option<Arc<dyn ListGroupsHandler>>>,
    notification_options: NotificationOptions,
    experimental: HashMap<String, serde_json::Value>,
    notifier: ListChangedNotifier,
}

impl GroupServer {
    /// A server with an empty registry and no `groups/list` handler.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, GroupRegistry::new())
    }

    /// A server around an existing (usually empty) registry.
    pub fn with_registry(name: impl Into<String>, registry: GroupRegistry) -> Self {
        Self {
            info: Implementation::server(name),
            instructions: None,
            registry: Arc::new(registry),
            list_handler: RwLock::new(None),
            notification_options: NotificationOptions::default(),
            experimental: HashMap::new(),
            notifier: ListChangedNotifier::new(),
        }
    }

    /// Build a server from configuration: duplicate policy, notification
    /// options, the registry-backed handler, and seed groups.
    pub fn from_config(config: &ServerConfig) -> McpResult<Self> {
        let registry = GroupRegistry::with_duplicate_warnings(config.warn_on_duplicate_groups);
        let mut server = Self::with_registry(config.server_name.clone(), registry)
            .with_notification_options(config.notifications);
        server.instructions = config.instructions.clone();

        if config.groups.enabled {
            match config.groups.page_size {
                Some(size) => server.use_paged_registry_handler(size),
                None => server.use_registry_handler(),
            }
        }

        for seed in &config.groups.seed {
            server.add_group(seed.to_group())?;
        }

        tracing::info!(
            "Server '{}' ready with {} group(s), groups/list {}",
            server.info.name,
            server.registry.len(),
            if server.has_list_groups_handler() { "enabled" } else { "disabled" }
        );
        Ok(server)
    }

    pub fn with_notification_options(mut self, options: NotificationOptions) -> Self {
        self.notification_options = options;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Add an experimental capability advertised verbatim.
    pub fn with_experimental(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.experimental.insert(key.into(), value);
        self
    }

    pub fn info(&self) -> &Implementation {
        &self.info
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    pub fn notification_options(&self) -> NotificationOptions {
        self.notification_options
    }

    // ----- handler registration -------------------------------------------

    /// Install a `groups/list` handler, replacing any previous one.
    ///
    /// Sessions that already negotiated keep the capabilities they were given.
    pub fn set_list_groups_handler(&self, handler: Arc<dyn ListGroupsHandler>) {
        *self
            .list_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    /// Install a handler that ignores the cursor and returns every group.
    pub fn list_groups_with<F, Fut>(&self, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<Group>> + Send + 'static,
    {
        self.set_list_groups_handler(Arc::new(IgnoreCursor::new(f)));
    }

    /// Install a handler that receives the request and may page.
    pub fn list_groups_paged<F, Fut>(&self, f: F)
    where
        F: Fn(ListParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListGroupsResult> + Send + 'static,
    {
        self.set_list_groups_handler(Arc::new(WithRequest::new(f)));
    }

    /// Serve the whole registry as one page.
    pub fn use_registry_handler(&self) {
        self.set_list_groups_handler(Arc::new(RegistryHandler::new(Arc::clone(&self.registry))));
    }

    /// Serve the registry in pages of `page_size`.
    pub fn use_paged_registry_handler(&self, page_size: usize) {
        self.set_list_groups_handler(Arc::new(PagedRegistryHandler::new(
            Arc::clone(&self.registry),
            page_size,
        )));
    }

    pub fn clear_list_groups_handler(&self) {
        *self
            .list_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_list_groups_handler(&self) -> bool {
        self.list_groups_handler().is_some()
    }

    pub fn list_groups_handler(&self) -> Option<Arc<dyn ListGroupsHandler>> {
        self.list_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ----- capabilities ---------------------------------------------------

    /// Capabilities for the given notification options.
    ///
    /// `groups` is present only when a list handler is installed.
    pub fn get_capabilities(
        &self,
        notification_options: &NotificationOptions,
        experimental_capabilities: HashMap<String, serde_json::Value>,
    ) -> ServerCapabilities {
        let groups = self.has_list_groups_handler().then_some(GroupsCapability {
            list_changed: notification_options.groups_changed,
        });
        let experimental =
            (!experimental_capabilities.is_empty()).then_some(experimental_capabilities);

        ServerCapabilities {
            experimental,
            groups,
        }
    }

    /// Capabilities under this server's own configuration.
    pub fn capabilities(&self) -> ServerCapabilities {
        self.get_capabilities(&self.notification_options, self.experimental.clone())
    }

    /// The `initialize` result for a new session, snapshotting capabilities now.
    pub fn initialize_result(&self) -> InitializeResult {
        let result = InitializeResult::new(self.capabilities(), self.info.clone());
        match &self.instructions {
            Some(text) => result.with_instructions(text.clone()),
            None => result,
        }
    }

    // ----- registration API -----------------------------------------------

    /// Register a group. A duplicate name returns the existing record.
    pub fn add_group(&self, group: Group) -> McpResult<Group> {
        let registration = self.registry.register(group)?;
        if registration.is_new() {
            self.notifier.notify();
        }
        Ok(registration.into_group())
    }

    /// Remove a group if present. Groups naming it as a parent are untouched.
    pub fn remove_group(&self, name: &str) {
        if self.registry.remove(name) {
            self.notifier.notify();
        }
    }

    pub fn get_group(&self, name: &str) -> Option<Group> {
        self.registry.get(name)
    }

    /// All registered groups in registration order.
    pub fn list_groups(&self) -> Vec<Group> {
        self.registry.list()
    }

    /// Receive a signal each time the group set changes.
    pub fn subscribe_list_changed(&self) -> broadcast::Receiver<()> {
        self.notifier.subscribe()
    }

    // ----- request handling -----------------------------------------------

    /// Run the installed list handler. No lock is held while it runs.
    pub async fn handle_list_groups(&self, params: ListParams) -> McpResult<ListGroupsResult> {
        let handler = self
            .list_groups_handler()
            .ok_or_else(|| McpError::MethodNotFound(GROUPS_LIST.to_string()))?;
        handler.list_groups(params).await
    }
}
