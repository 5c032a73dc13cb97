//! MCP capability negotiation during initialization.

use crate::server::GroupServer;
use crate::types::{
    ClientCapabilities, InitializeParams, InitializeResult, McpError, McpResult,
    ServerCapabilities, MCP_VERSION,
};

/// Where a session is in its handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No `initialize` yet.
    Uninitialized,
    /// Capabilities exchanged and fixed for the rest of the session.
    Negotiated,
}

/// Per-session record of what was negotiated.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    /// The client's declared capabilities.
    pub client: ClientCapabilities,
    /// What this server advertised; `None` until negotiation.
    pub server: Option<ServerCapabilities>,
    /// Whether the client confirmed with `notifications/initialized`.
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    pub fn phase(&self) -> SessionPhase {
        if self.server.is_some() {
            SessionPhase::Negotiated
        } else {
            SessionPhase::Uninitialized
        }
    }

    /// Process an initialize request, snapshotting the server's capabilities.
    ///
    /// Handlers registered or removed afterwards do not change the snapshot.
    pub fn negotiate(
        &mut self,
        params: InitializeParams,
        server: &GroupServer,
    ) -> McpResult<InitializeResult> {
        if self.phase() == SessionPhase::Negotiated {
            return Err(McpError::InvalidRequest(
                "Session already initialized".to_string(),
            ));
        }

        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        let result = server.initialize_result();
        self.client = params.capabilities;
        self.server = Some(result.capabilities.clone());

        tracing::info!(
            "Initialized with client: {} v{} (groups capability {})",
            params.client_info.name,
            params.client_info.version,
            if result.capabilities.groups.is_some() { "advertised" } else { "absent" }
        );

        Ok(result)
    }

    /// Mark the handshake as complete (after receiving `initialized` notification).
    pub fn mark_initialized(&mut self) {
        if self.phase() == SessionPhase::Uninitialized {
            tracing::warn!("Received initialized notification before initialize");
        }
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }

    /// The advertised capabilities, or an error if negotiation has not happened.
    pub fn ensure_negotiated(&self) -> McpResult<&ServerCapabilities> {
        self.server.as_ref().ok_or(McpError::NotInitialized)
    }

    /// Whether groups/list was advertised to this peer.
    pub fn groups_advertised(&self) -> bool {
        self.server.as_ref().is_some_and(|caps| caps.groups.is_some())
    }

    /// Whether this peer was promised groups list_changed notifications.
    pub fn groups_list_changed(&self) -> bool {
        self.server
            .as_ref()
            .and_then(|caps| caps.groups)
            .is_some_and(|groups| groups.list_changed)
    }
}
