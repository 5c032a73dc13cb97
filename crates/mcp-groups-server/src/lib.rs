//! MCP groups server: capability-gated `groups/list` over a group registry.
//!
//! Application code registers groups on a [`GroupServer`]; each connected
//! client gets a [`ProtocolHandler`] that negotiates capabilities once and
//! then answers `groups/list`, optionally pushing
//! `notifications/groups/list_changed` when the group set changes.

pub mod config;
pub mod groups;
pub mod protocol;
pub mod server;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use groups::ListGroupsHandler;
pub use protocol::ProtocolHandler;
pub use server::GroupServer;
pub use transport::StdioTransport;
