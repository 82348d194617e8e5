// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims embedded in issued tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};

/// Claims carried by an access token.
///
/// Standard claims follow RFC 7519 naming; `role` is the one custom claim.
/// A claim set is constructed fresh at issuance and never mutated:
/// the signature covers every field, so any alteration is detected on
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity's stable id, stringified.
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued-at time (Unix timestamp, seconds).
    pub iat: i64,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Role granted to the subject.
    pub role: Role,
}

impl Claims {
    /// Creates a claim set for an identity, expiring `lifetime_secs` from now.
    pub fn for_identity(identity: &Identity, lifetime_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: identity.id.to_string(),
            exp: now + lifetime_secs,
            iat: now,
            iss: None,
            aud: None,
            role: identity.role,
        }
    }

    /// Sets the issuer claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Sets the audience claim.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Returns the subject identifier.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the claims carry the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Returns the expiry instant as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issue instant as a `DateTime`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
