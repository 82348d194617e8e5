// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity store abstraction and the in-memory implementation.

use std::collections::HashMap;

use crate::error::{AuthError, AuthResult};
use crate::identity::{Identity, Role};

// =============================================================================
// IdentityStore
// =============================================================================

/// Lookup capability over identity records.
///
/// The store is read-only from the core's perspective; implementations back
/// it with whatever storage they like. Lookups are synchronous, so callers
/// never hold locks across await points.
pub trait IdentityStore: Send + Sync {
    /// Returns the identity with the given username, or `None`.
    fn find_by_username(&self, username: &str) -> Option<Identity>;

    /// Returns every identity in the store.
    ///
    /// Used for roster listings; ordering is unspecified.
    fn all(&self) -> Vec<Identity>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory identity store with a preloaded roster.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    identities: HashMap<String, Identity>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a roster of identities.
    ///
    /// Fails with a configuration error if two entries share a username.
    pub fn from_identities(identities: impl IntoIterator<Item = Identity>) -> AuthResult<Self> {
        let mut map = HashMap::new();
        for identity in identities {
            let username = identity.username.clone();
            if map.insert(username.clone(), identity).is_some() {
                return Err(AuthError::config(format!(
                    "duplicate username in identity roster: {}",
                    username
                )));
            }
        }
        Ok(Self { identities: map })
    }

    /// Creates a store seeded with the demo roster.
    pub fn with_demo_users() -> Self {
        let identities = [
            Identity::new(1, "saikiran", "Saikiran", "Sai", "Kiran", Role::Admin),
            Identity::new(2, "hari", "Hari", "Hari", "Krishna", Role::User),
        ];
        // Usernames are distinct by construction.
        Self::from_identities(identities).expect("demo roster is duplicate-free")
    }

    /// Returns the number of identities in the store.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` if the store holds no identities.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl IdentityStore for MemoryStore {
    fn find_by_username(&self, username: &str) -> Option<Identity> {
        self.identities.get(username).cloned()
    }

    fn all(&self) -> Vec<Identity> {
        let mut all: Vec<Identity> = self.identities.values().cloned().collect();
        all.sort_by_key(|identity| identity.id);
        all
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster() {
        let store = MemoryStore::with_demo_users();
        assert_eq!(store.len(), 2);

        let admin = store.find_by_username("saikiran").unwrap();
        assert_eq!(admin.id, 1);
        assert_eq!(admin.role, Role::Admin);

        let user = store.find_by_username("hari").unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_unknown_username() {
        let store = MemoryStore::with_demo_users();
        assert!(store.find_by_username("nobody").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = MemoryStore::with_demo_users();
        assert!(store.find_by_username("Saikiran").is_none());
    }

    #[test]
    fn test_duplicate_usernames_rejected() {
        let result = MemoryStore::from_identities([
            Identity::new(1, "sam", "a", "Sam", "One", Role::User),
            Identity::new(2, "sam", "b", "Sam", "Two", Role::Admin),
        ]);
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_all_sorted_by_id() {
        let store = MemoryStore::with_demo_users();
        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
    }
}
