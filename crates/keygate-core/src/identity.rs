// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity model: roles, identity records, and transient credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The closed set of roles an identity can hold.
///
/// Roles are serialized with their canonical capitalized names (`"User"`,
/// `"Admin"`) so the role claim embedded in tokens matches what policy
/// definitions and external consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Standard authenticated user.
    User,
    /// Administrative access.
    Admin,
}

impl Role {
    /// Returns the canonical role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }

    /// Parses a role from a string, accepting common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns all defined roles.
    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Admin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Identity
// =============================================================================

/// An identity record as held by the identity store.
///
/// Invariant: `username` is unique within a store. The password is stored in
/// cleartext for parity with the system this replaces; hashing it would
/// change observable verification semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque stable identifier; becomes the token's subject claim.
    pub id: u32,
    /// Unique login name.
    pub username: String,
    /// Stored password secret (cleartext).
    #[serde(skip_serializing)]
    pub password: String,
    /// Display first name.
    pub first_name: String,
    /// Display last name.
    pub last_name: String,
    /// Assigned role.
    pub role: Role,
}

impl Identity {
    /// Creates a new identity record.
    pub fn new(
        id: u32,
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
        }
    }

    /// Clears the stored password secret in place.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    /// Returns a password-free projection safe to put on the wire.
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
        }
    }
}

/// Identity attributes without the password secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIdentity {
    /// Stable identifier.
    pub id: u32,
    /// Login name.
    pub username: String,
    /// Display first name.
    pub first_name: String,
    /// Display last name.
    pub last_name: String,
    /// Assigned role.
    pub role: Role,
}

// =============================================================================
// Credentials
// =============================================================================

/// A transient username/password pair supplied per authentication attempt.
///
/// Never persisted; `Debug` redacts the password.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Submitted username.
    pub username: String,
    /// Submitted password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
