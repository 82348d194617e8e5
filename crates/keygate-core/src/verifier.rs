// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential verification against the identity store.

use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::identity::Identity;
use crate::store::IdentityStore;

/// Verifies submitted credentials against the identity store.
///
/// The verifier is stateless; it holds only a shared handle to the
/// read-only store and can be called concurrently without locking.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
}

impl CredentialVerifier {
    /// Creates a verifier over the given store.
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Verifies a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both produce
    /// [`AuthError::InvalidCredentials`]; the two cases are deliberately
    /// indistinguishable. On success the returned identity has its stored
    /// password cleared so the secret never leaves this component.
    ///
    /// Stored secrets are compared with plain equality, matching the
    /// cleartext roster this verifier fronts.
    pub fn verify(&self, username: &str, password: &str) -> AuthResult<Identity> {
        let Some(mut identity) = self.store.find_by_username(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        if identity.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        identity.clear_password();
        Ok(identity)
    }

    /// Returns a shared handle to the underlying store.
    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier").finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;
    use crate::store::MemoryStore;

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(Arc::new(MemoryStore::with_demo_users()))
    }

    #[test]
    fn test_correct_credentials() {
        let identity = verifier().verify("saikiran", "Saikiran").unwrap();
        assert_eq!(identity.id, 1);
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_password_cleared_on_success() {
        let identity = verifier().verify("hari", "Hari").unwrap();
        assert!(identity.password.is_empty());
    }

    #[test]
    fn test_wrong_password_and_unknown_user_indistinguishable() {
        let wrong_password = verifier().verify("saikiran", "wrong").unwrap_err();
        let unknown_user = verifier().verify("nobody", "anything").unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn test_empty_strings_fail_to_match() {
        assert!(verifier().verify("", "").is_err());
        assert!(verifier().verify("saikiran", "").is_err());
    }

    #[test]
    fn test_every_roster_entry_verifies() {
        let store = MemoryStore::with_demo_users();
        let verifier = CredentialVerifier::new(Arc::new(store.clone()));

        for identity in store.all() {
            let original = store.find_by_username(&identity.username).unwrap();
            let verified = verifier
                .verify(&identity.username, &original.password)
                .unwrap();
            assert_eq!(verified.id, identity.id);
        }
    }
}
