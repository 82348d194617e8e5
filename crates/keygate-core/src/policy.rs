// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based authorization policies.
//!
//! Policies are data, not code: a [`PolicyTable`] maps policy names to
//! predicates over a claim set, so new policies are added by registering
//! entries rather than by touching evaluation logic.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::claims::Claims;
use crate::identity::Role;

// =============================================================================
// Decision
// =============================================================================

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The operation may proceed.
    Allow,
    /// The operation is refused.
    Deny,
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

// =============================================================================
// Policy
// =============================================================================

/// A named predicate over a claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// Allow any principal with a validated claim set.
    RequireAuthenticated,
    /// Allow only principals whose role is in the given set.
    RequireRole {
        /// Roles that satisfy the policy.
        roles: Vec<Role>,
    },
}

impl Policy {
    /// Convenience constructor for a role-membership policy.
    pub fn require_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RequireRole {
            roles: roles.into_iter().collect(),
        }
    }

    /// Evaluates the policy against a validated claim set.
    ///
    /// The claim set has already passed token validation, so
    /// `RequireAuthenticated` always allows.
    pub fn authorize(&self, claims: &Claims) -> Decision {
        match self {
            Policy::RequireAuthenticated => Decision::Allow,
            Policy::RequireRole { roles } => {
                if roles.contains(&claims.role) {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        }
    }
}

// =============================================================================
// PolicyTable
// =============================================================================

/// Named authorization policies, resolved per protected operation.
///
/// Built once at startup and shared read-only across requests. Operations
/// without an explicit policy fall back to the default policy
/// (`RequireAuthenticated`); an unknown policy name denies.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: Arc<HashMap<String, Policy>>,
    default_policy: Policy,
}

impl PolicyTable {
    /// Creates a table with the built-in policies.
    ///
    /// `"UserAndAdmin"` admits both roles; `"AdminOnly"` admits only
    /// administrators.
    pub fn new() -> Self {
        Self::builder().with_default_policies().build()
    }

    /// Creates a table builder.
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::new()
    }

    /// Returns the policy registered under the given name.
    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Evaluates a policy by name against a claim set.
    ///
    /// `None` selects the default policy; an unknown name denies.
    pub fn evaluate(&self, name: Option<&str>, claims: &Claims) -> Decision {
        match name {
            None => self.default_policy.authorize(claims),
            Some(name) => match self.policies.get(name) {
                Some(policy) => policy.authorize(claims),
                None => {
                    tracing::warn!(policy = name, "unknown authorization policy, denying");
                    Decision::Deny
                }
            },
        }
    }

    /// Returns the default policy.
    pub fn default_policy(&self) -> &Policy {
        &self.default_policy
    }

    /// Returns all registered policy names.
    pub fn names(&self) -> Vec<&str> {
        self.policies.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PolicyTableBuilder
// =============================================================================

/// Builder for constructing policy tables.
#[derive(Debug)]
pub struct PolicyTableBuilder {
    policies: HashMap<String, Policy>,
    default_policy: Policy,
}

impl PolicyTableBuilder {
    /// Creates an empty builder with `RequireAuthenticated` as the default.
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
            default_policy: Policy::RequireAuthenticated,
        }
    }

    /// Registers the built-in policy entries.
    pub fn with_default_policies(mut self) -> Self {
        self.policies.insert(
            "UserAndAdmin".to_string(),
            Policy::require_role([Role::User, Role::Admin]),
        );
        self.policies
            .insert("AdminOnly".to_string(), Policy::require_role([Role::Admin]));
        self
    }

    /// Registers a named policy.
    pub fn add_policy(mut self, name: impl Into<String>, policy: Policy) -> Self {
        self.policies.insert(name.into(), policy);
        self
    }

    /// Sets the default policy for operations without an explicit one.
    pub fn default_policy(mut self, policy: Policy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Builds the table.
    pub fn build(self) -> PolicyTable {
        PolicyTable {
            policies: Arc::new(self.policies),
            default_policy: self.default_policy,
        }
    }
}

impl Default for PolicyTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
