// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authentication context.

use std::net::IpAddr;

use uuid::Uuid;

use keygate_core::{Claims, Role};

/// Authentication context attached to every request.
///
/// Inserted by the auth middleware: requests on public paths carry an
/// anonymous context, everything else carries the validated claim set.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated claims, or `None` for anonymous (public-path) requests.
    pub claims: Option<Claims>,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates a context from a validated claim set.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Creates an anonymous context for public-path requests.
    pub fn anonymous() -> Self {
        Self {
            claims: None,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if no principal is attached.
    pub fn is_anonymous(&self) -> bool {
        self.claims.is_none()
    }

    /// Returns the subject identifier, if authenticated.
    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.subject())
    }

    /// Returns the principal's role, if authenticated.
    pub fn role(&self) -> Option<Role> {
        self.claims.as_ref().map(|c| c.role)
    }

    /// Returns `true` if the principal holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================
