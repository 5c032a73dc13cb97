//! Error types for group registration.

use thiserror::Error;

/// Errors produced by the group registry.
///
/// Lookups of unknown names, removals of absent groups and duplicate
/// registrations are deliberately not represented here: they resolve to
/// `None`, a no-op, or the existing record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The group name was empty or contained only whitespace.
    #[error("invalid group name {0:?}: names must be non-empty")]
    InvalidName(String),
}

/// Convenience alias for registry results.
pub type GroupResult<T> = Result<T, GroupError>;
