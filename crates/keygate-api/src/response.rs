// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use serde::{Deserialize, Serialize};

use keygate_core::{PublicIdentity, Role};

// =============================================================================
// LoginResponse
// =============================================================================

/// Successful authentication response: the identity's public attributes
/// plus a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Identity attributes, password excluded.
    pub user: PublicIdentity,
    /// Access token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

impl LoginResponse {
    /// Creates a login response.
    pub fn new(user: PublicIdentity, token: String, expires_in: i64) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

// =============================================================================
// CurrentUserResponse
// =============================================================================

/// The authenticated principal as seen through its token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    /// Subject identifier from the token.
    pub subject: String,
    /// Role claim from the token.
    pub role: Role,
    /// Token expiry (Unix timestamp, seconds).
    pub expires_at: i64,
}

// =============================================================================
// HealthResponse
// =============================================================================

/// Liveness check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, always "ok" when reachable.
    pub status: String,
    /// Service version.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_token_type() {
        let user = PublicIdentity {
            id: 1,
            username: "saikiran".to_string(),
            first_name: "Sai".to_string(),
            last_name: "Kiran".to_string(),
            role: Role::Admin,
        };
        let response = LoginResponse::new(user, "a.b.c".to_string(), 30);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 30);
    }

    #[test]
    fn test_health_response() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "ok");
        assert!(!response.version.is_empty());
    }
}
