//! `groups/list` handlers, pagination, and change notifications.

pub mod handler;
pub mod notifier;
pub mod pagination;

pub use handler::{IgnoreCursor, ListGroupsHandler, RegistryHandler, WithRequest};
pub use notifier::{spawn_forwarder, ListChangedNotifier};
pub use pagination::PagedRegistryHandler;
