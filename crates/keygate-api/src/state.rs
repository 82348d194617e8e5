// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use keygate_core::{CredentialVerifier, PolicyTable, TokenEngine};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Everything in here is read-only after startup, so cloning the state per
/// request copies only `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Credential verifier over the identity store.
    pub verifier: CredentialVerifier,
    /// Token issuance and validation engine.
    pub tokens: Arc<TokenEngine>,
    /// Named authorization policies.
    pub policies: PolicyTable,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token engine.
    pub fn tokens(&self) -> &TokenEngine {
        &self.tokens
    }

    /// Returns the credential verifier.
    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    /// Returns the policy table.
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    verifier: Option<CredentialVerifier>,
    tokens: Option<Arc<TokenEngine>>,
    policies: Option<PolicyTable>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the credential verifier.
    pub fn verifier(mut self, verifier: CredentialVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Sets the token engine.
    pub fn tokens(mut self, tokens: Arc<TokenEngine>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the policy table.
    pub fn policies(mut self, policies: PolicyTable) -> Self {
        self.policies = Some(policies);
        self
    }

    /// Builds the state.
    ///
    /// The verifier and token engine are required; configuration and the
    /// policy table fall back to defaults.
    pub fn build(self) -> ApiResult<AppState> {
        let verifier = self
            .verifier
            .ok_or_else(|| ApiError::internal("credential verifier is required"))?;
        let tokens = self
            .tokens
            .ok_or_else(|| ApiError::internal("token engine is required"))?;

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            verifier,
            tokens,
            policies: self.policies.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::{MemoryStore, TokenConfig};

    #[test]
    fn test_builder_requires_components() {
        assert!(AppState::builder().build().is_err());
    }

    #[test]
    fn test_builder_with_components() {
        let store = Arc::new(MemoryStore::with_demo_users());
        let engine =
            TokenEngine::new(TokenConfig::new("test-secret-key-that-is-long-enough")).unwrap();

        let state = AppState::builder()
            .verifier(CredentialVerifier::new(store))
            .tokens(Arc::new(engine))
            .build()
            .unwrap();

        assert_eq!(state.config.port, 8080);
        assert!(state.policies().get("AdminOnly").is_some());
    }
}
