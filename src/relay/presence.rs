//! Typing presence tracker

use std::collections::HashSet;

use parking_lot::RwLock;

/// Users the relay currently believes are typing.
///
/// A user is present iff a `typing_start` was seen for them and neither a
/// `typing_stop` nor a connection close has cleared it since.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    typing: RwLock<HashSet<String>>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as typing. Returns true if they were not already marked.
    pub fn mark_typing(&self, user: &str) -> bool {
        self.typing.write().insert(user.to_string())
    }

    /// Clear a user's typing marker. Returns true if one was removed.
    pub fn clear_typing(&self, user: &str) -> bool {
        self.typing.write().remove(user)
    }

    pub fn is_typing(&self, user: &str) -> bool {
        self.typing.read().contains(user)
    }

    /// Snapshot of all typing users, sorted for stable output
    pub fn all_typing_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.typing.read().iter().cloned().collect();
        users.sort();
        users
    }

    /// Remove every marker and return the users that were cleared
    pub fn clear_all(&self) -> Vec<String> {
        let mut users: Vec<String> = self.typing.write().drain().collect();
        users.sort();
        users
    }

    pub fn len(&self) -> usize {
        self.typing.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.typing.read().is_empty()
    }
}
