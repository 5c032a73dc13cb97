//! MCP error type and JSON-RPC error codes.

use thiserror::Error;

use mcp_groups::GroupError;

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined error codes (JSON-RPC reserves -32000..-32099 for these).
pub mod mcp_error_codes {
    /// A request other than `initialize`/`ping` arrived before the handshake.
    pub const NOT_INITIALIZED: i32 = -32002;
    /// A group could not be registered.
    pub const INVALID_GROUP: i32 = -32010;
}

/// Errors surfaced by the server crate.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Server not initialized")]
    NotInitialized,

    #[error("Invalid group: {0}")]
    Group(#[from] GroupError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            McpError::ParseError(_) | McpError::Json(_) => error_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            McpError::NotInitialized => mcp_error_codes::NOT_INITIALIZED,
            McpError::Group(_) => mcp_error_codes::INVALID_GROUP,
            McpError::Config(_) | McpError::Io(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Build the JSON-RPC error response for a failed request.
    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }
}

/// Convenience alias used throughout the server crate.
pub type McpResult<T> = Result<T, McpError>;
