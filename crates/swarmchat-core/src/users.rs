//! User directory
//!
//! Tracks every validly-attributed, non-anonymous author seen this session.
//! Entries are never removed; the blocked flag is a pure display filter and
//! does not affect what gets stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ----------------------------------------------------------------------------
// User
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub avatar: Option<String>,
    pub blocked: bool,
}

// ----------------------------------------------------------------------------
// User Directory
// ----------------------------------------------------------------------------

/// Session-scoped registry of seen users, keyed by username
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user on first sight. Returns true if the user was newly
    /// added (the caller surfaces new names as autocomplete candidates).
    pub fn register(&mut self, username: &str, avatar: Option<String>) -> bool {
        if self.users.contains_key(username) {
            return false;
        }
        self.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                avatar,
                blocked: false,
            },
        );
        true
    }

    /// Flip the display-filter flag for a user. Returns the new state, or
    /// None if the user is unknown.
    pub fn toggle_block(&mut self, username: &str) -> Option<bool> {
        let user = self.users.get_mut(username)?;
        user.blocked = !user.blocked;
        Some(user.blocked)
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_reports_first_sight_only() {
        let mut directory = UserDirectory::new();
        assert!(directory.register("alice", None));
        assert!(!directory.register("alice", Some("avatar.png".to_string())));
        assert_eq!(directory.len(), 1);
        // First sight wins; later avatars do not overwrite.
        assert_eq!(directory.get("alice").unwrap().avatar, None);
    }

    #[test]
    fn test_toggle_block_roundtrips() {
        let mut directory = UserDirectory::new();
        directory.register("alice", None);
        assert_eq!(directory.toggle_block("alice"), Some(true));
        assert_eq!(directory.toggle_block("alice"), Some(false));
        assert_eq!(directory.toggle_block("nobody"), None);
    }
}
