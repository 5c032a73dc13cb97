//! MCP groups: named, optionally hierarchical labels for tools, resources and prompts.
//!
//! This crate holds the data model and the in-memory [`GroupRegistry`]. It does
//! no I/O and knows nothing about JSON-RPC; the `mcp-groups-server` crate layers
//! capability negotiation and `groups/list` on top of it.
//!
//! Hierarchy is expressed purely through metadata: a group (or any other
//! primitive) lists the names of the groups it belongs to under
//! [`GROUPS_META_KEY`]. The registry stores that metadata verbatim and never
//! reads it.

pub mod error;
pub mod group;
pub mod meta;
pub mod registry;

pub use error::{GroupError, GroupResult};
pub use group::{Annotations, Group, Icon, Role};
pub use meta::{group_memberships, Meta, GROUPS_META_KEY};
pub use registry::{GroupRegistry, Registration};
