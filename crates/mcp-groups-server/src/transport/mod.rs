//! Transports carrying the session's JSON-RPC messages.

pub mod stdio;

pub use stdio::StdioTransport;
