//! All MCP data types used by the server.

pub mod capabilities;
pub mod error;
pub mod message;
pub mod notification;
pub mod request;
pub mod response;

// Re-export commonly used types for convenience.
pub use capabilities::*;
pub use error::*;
pub use message::*;
pub use notification::{groups_list_changed, CancelledParams, GROUPS_LIST_CHANGED};
pub use request::*;
pub use response::*;

pub use mcp_groups::{Annotations, Group, Icon, Meta, Role, GROUPS_META_KEY};
