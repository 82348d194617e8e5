// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core error taxonomy.
//!
//! Expected failure modes (bad credentials, bad tokens, denied access) are
//! returned as values, never panics. [`AuthError::Configuration`] is the one
//! condition treated as fatal at startup rather than per request.

use thiserror::Error;

/// Result type alias for core operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors produced by the authentication core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password. Deliberately unified so callers
    /// cannot distinguish the two and enumerate usernames.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Missing or unusable configuration (e.g. signing secret too short).
    /// Fatal at startup, never a per-request outcome.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token is not a parseable three-part JWT.
    #[error("malformed token")]
    TokenMalformed,

    /// Token signature does not match the signing secret.
    #[error("invalid token signature")]
    TokenBadSignature,

    /// Token is past its expiry instant.
    #[error("token expired")]
    TokenExpired,

    /// Valid token, insufficient role for the requested operation.
    #[error("access denied")]
    Denied,
}

impl AuthError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns a stable error code for logging and API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "CREDENTIAL_INVALID",
            AuthError::Configuration(_) => "CONFIGURATION_ERROR",
            AuthError::TokenMalformed => "TOKEN_MALFORMED",
            AuthError::TokenBadSignature => "TOKEN_BAD_SIGNATURE",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::Denied => "AUTHORIZATION_DENIED",
        }
    }

    /// Returns `true` if this error relates to a presented token rather
    /// than to submitted credentials or configuration.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::TokenMalformed | AuthError::TokenBadSignature | AuthError::TokenExpired
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::InvalidCredentials.code(), "CREDENTIAL_INVALID");
        assert_eq!(AuthError::TokenExpired.code(), "TOKEN_EXPIRED");
        assert_eq!(AuthError::config("x").code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_is_token_error() {
        assert!(AuthError::TokenMalformed.is_token_error());
        assert!(AuthError::TokenBadSignature.is_token_error());
        assert!(AuthError::TokenExpired.is_token_error());
        assert!(!AuthError::InvalidCredentials.is_token_error());
        assert!(!AuthError::Denied.is_token_error());
    }

    #[test]
    fn test_credential_error_message_is_uniform() {
        // The user-visible message must not reveal which check failed.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid username or password"
        );
    }
}
