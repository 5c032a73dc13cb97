//! In-memory group store with first-registration-wins semantics.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{GroupError, GroupResult};
use crate::group::Group;

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// The group was new and has been stored.
    Inserted(Group),
    /// A group with that name already existed; this is the stored record.
    Existing(Group),
}

impl Registration {
    /// Whether the registry's group set changed.
    pub fn is_new(&self) -> bool {
        matches!(self, Registration::Inserted(_))
    }

    /// The record now held by the registry.
    pub fn group(&self) -> &Group {
        match self {
            Registration::Inserted(g) | Registration::Existing(g) => g,
        }
    }

    pub fn into_group(self) -> Group {
        match self {
            Registration::Inserted(g) | Registration::Existing(g) => g,
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_name: HashMap<String, Group>,
    // Insertion order of the names in `by_name`.
    order: Vec<String>,
}

/// Registry of groups owned by one server instance.
///
/// All access goes through a single `RwLock`, so a reader sees the registry
/// either before or after a mutation, never halfway. Stored records are never
/// modified; every read hands out a copy.
#[derive(Debug)]
pub struct GroupRegistry {
    entries: RwLock<Entries>,
    warn_on_duplicate_groups: bool,
}

impl GroupRegistry {
    /// Create an empty registry that warns on duplicate registrations.
    pub fn new() -> Self {
        Self::with_duplicate_warnings(true)
    }

    /// Create an empty registry, choosing whether duplicates are logged.
    pub fn with_duplicate_warnings(warn_on_duplicate_groups: bool) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            warn_on_duplicate_groups,
        }
    }

    /// Whether duplicate registrations are logged.
    pub fn warns_on_duplicates(&self) -> bool {
        self.warn_on_duplicate_groups
    }

    /// Register a group, reporting whether it was new.
    ///
    /// If the name is taken the stored record is returned unchanged and the
    /// supplied one is discarded.
    pub fn register(&self, group: Group) -> GroupResult<Registration> {
        if group.name.trim().is_empty() {
            return Err(GroupError::InvalidName(group.name));
        }

        let registration = {
            let mut entries = self.write();
            match entries.by_name.get(&group.name) {
                Some(existing) => Registration::Existing(existing.clone()),
                None => {
                    entries.order.push(group.name.clone());
                    entries.by_name.insert(group.name.clone(), group.clone());
                    Registration::Inserted(group)
                }
            }
        };

        if !registration.is_new() && self.warn_on_duplicate_groups {
            log::warn!("Group '{}' is already registered", registration.group().name);
        }
        Ok(registration)
    }

    /// Add a group, returning the record the registry holds for its name.
    pub fn add(&self, group: Group) -> GroupResult<Group> {
        self.register(group).map(Registration::into_group)
    }

    /// Look up a group by exact name.
    pub fn get(&self, name: &str) -> Option<Group> {
        self.read().by_name.get(name).cloned()
    }

    /// Remove a group. Returns `true` if it was present.
    ///
    /// Other groups naming it in their metadata are left as they are.
    pub fn remove(&self, name: &str) -> bool {
        let mut entries = self.write();
        if entries.by_name.remove(name).is_none() {
            return false;
        }
        entries.order.retain(|n| n != name);
        log::debug!("Removed group '{name}'");
        true
    }

    /// Snapshot of all groups in insertion order.
    pub fn list(&self) -> Vec<Group> {
        let entries = self.read();
        entries
            .order
            .iter()
            .filter_map(|name| entries.by_name.get(name).cloned())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Records are immutable once stored, so a panic while holding the lock
    // cannot leave a half-written entry behind; recover from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
