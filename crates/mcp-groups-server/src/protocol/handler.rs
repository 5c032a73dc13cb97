//! Per-session JSON-RPC dispatch.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::groups::spawn_forwarder;
use crate::server::GroupServer;
use crate::types::notification::{CANCELLED, INITIALIZED, INITIALIZED_LEGACY};
use crate::types::{
    CancelledParams, EmptyResult, InitializeParams, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, McpError, McpResult, GROUPS_LIST, INITIALIZE, PING,
};

use super::negotiation::NegotiatedCapabilities;
use super::validator;

/// Handles the messages of one client session against a shared [`GroupServer`].
///
/// Safe to call concurrently: requests only hold the session lock long enough
/// to read the negotiated state, never across a handler's `.await`.
pub struct ProtocolHandler {
    server: Arc<GroupServer>,
    capabilities: Mutex<NegotiatedCapabilities>,
    outbound: Option<mpsc::Sender<JsonRpcNotification>>,
    forwarder: StdMutex<Option<JoinHandle<()>>>,
}

impl ProtocolHandler {
    /// A session with no channel for server-initiated notifications.
    ///
    /// It still advertises `listChanged` when the server enables it, but no
    /// `notifications/groups/list_changed` can reach the peer. Use
    /// [`ProtocolHandler::with_notifications`] for sessions that should get them.
    pub fn new(server: Arc<GroupServer>) -> Self {
        Self {
            server,
            capabilities: Mutex::new(NegotiatedCapabilities::default()),
            outbound: None,
            forwarder: StdMutex::new(None),
        }
    }

    /// A session that pushes notifications to the peer through `outbound`.
    pub fn with_notifications(
        server: Arc<GroupServer>,
        outbound: mpsc::Sender<JsonRpcNotification>,
    ) -> Self {
        Self {
            server,
            capabilities: Mutex::new(NegotiatedCapabilities::default()),
            outbound: Some(outbound),
            forwarder: StdMutex::new(None),
        }
    }

    pub fn server(&self) -> &Arc<GroupServer> {
        &self.server
    }

    /// A copy of the session's negotiated state.
    pub async fn negotiated(&self) -> NegotiatedCapabilities {
        self.capabilities.lock().await.clone()
    }

    /// Handle one incoming message. Returns the JSON response for requests,
    /// `None` for notifications and responses.
    pub async fn handle_message(&self, message: JsonRpcMessage) -> Option<Value> {
        match message {
            JsonRpcMessage::Request(request) => Some(self.handle_request(request).await),
            JsonRpcMessage::Notification(notification) => {
                self.handle_notification(notification).await;
                None
            }
            JsonRpcMessage::Response(response) => {
                tracing::debug!("Ignoring response from client (id: {})", response.id);
                None
            }
            JsonRpcMessage::Error(error) => {
                tracing::debug!(
                    "Ignoring error from client (id: {}): {}",
                    error.id,
                    error.error.message
                );
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        tracing::debug!("Handling request: {} (id: {})", request.method, request.id);

        let id = request.id.clone();
        let outcome = match validator::validate_request(&request) {
            Ok(()) => self.dispatch(&request).await,
            Err(e) => Err(e),
        };

        let envelope = match outcome {
            Ok(result) => serde_json::to_value(JsonRpcResponse::new(id, result)),
            Err(e) => {
                tracing::debug!("Request {} failed: {e}", request.method);
                serde_json::to_value(e.to_json_rpc_error(id))
            }
        };
        envelope.unwrap_or(Value::Null)
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            INITIALIZE => self.handle_initialize(request.params.as_ref()).await,
            PING => Ok(serde_json::to_value(EmptyResult::default())?),
            GROUPS_LIST => self.handle_groups_list(request.params.as_ref()).await,
            other => {
                // Any other method still requires a completed negotiation.
                self.capabilities.lock().await.ensure_negotiated()?;
                Err(McpError::MethodNotFound(other.to_string()))
            }
        }
    }

    async fn handle_initialize(&self, params: Option<&Value>) -> McpResult<Value> {
        let params: InitializeParams = validator::parse_params(INITIALIZE, params)?;

        let (result, list_changed) = {
            let mut negotiated = self.capabilities.lock().await;
            let result = negotiated.negotiate(params, &self.server)?;
            (result, negotiated.groups_list_changed())
        };

        if list_changed {
            self.start_forwarding();
        }

        Ok(serde_json::to_value(result)?)
    }

    async fn handle_groups_list(&self, params: Option<&Value>) -> McpResult<Value> {
        let advertised = {
            let negotiated = self.capabilities.lock().await;
            negotiated.ensure_negotiated()?;
            negotiated.groups_advertised()
        };
        if !advertised {
            return Err(McpError::MethodNotFound(GROUPS_LIST.to_string()));
        }

        let params = validator::list_params(params);
        let result = self.server.handle_list_groups(params).await?;
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            INITIALIZED | INITIALIZED_LEGACY => {
                self.capabilities.lock().await.mark_initialized();
            }
            CANCELLED => match CancelledParams::from_params(notification.params.as_ref()) {
                Some(params) => tracing::info!(
                    "Client cancelled request {} ({})",
                    params.request_id,
                    params.reason.as_deref().unwrap_or("no reason given")
                ),
                None => tracing::debug!("Malformed cancellation notification"),
            },
            other => tracing::debug!("Unknown notification: {other}"),
        }
    }

    fn start_forwarding(&self) {
        let Some(outbound) = self.outbound.clone() else {
            tracing::warn!(
                "groups listChanged advertised but session has no notification channel; \
                 list_changed will not be delivered"
            );
            return;
        };
        let task = spawn_forwarder(self.server.subscribe_list_changed(), outbound);
        let mut slot = self.forwarder.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }
}

impl Drop for ProtocolHandler {
    fn drop(&mut self) {
        let slot = self
            .forwarder
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.take() {
            task.abort();
        }
    }
}
