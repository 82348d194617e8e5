// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Gateway runtime orchestration.
//!
//! This module wires the components together in order:
//!
//! - Configuration loading and validation
//! - Identity store and credential verifier
//! - Token engine and policy table
//! - API server with security middleware
//! - Graceful shutdown coordination

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use keygate_api::{ApiConfig, ApiServerBuilder};
use keygate_config::{load_config, KeygateConfig};
use keygate_core::{CredentialVerifier, MemoryStore, PolicyTable, TokenEngine};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// GatewayRuntime
// =============================================================================

/// The main gateway runtime that orchestrates all components.
///
/// The runtime is responsible for:
/// - Validating configuration
/// - Initializing all components in the correct order
/// - Running the HTTP server
/// - Coordinating graceful shutdown
pub struct GatewayRuntime {
    config: Arc<KeygateConfig>,
    shutdown: ShutdownCoordinator,
}

impl GatewayRuntime {
    /// Creates a new gateway runtime.
    pub fn new(config: KeygateConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Runs the gateway until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting Keygate v{}", keygate_core::VERSION);

        let server = self.build_server()?;
        let addr = server.addr();

        // Background task that waits for OS signals
        let coordinator = self.shutdown.clone();
        let signal = self.shutdown.shutdown_signal();
        tokio::spawn(async move {
            coordinator.wait_for_shutdown().await;
        });

        info!("Keygate is ready (API: {})", addr);

        server.run_with_shutdown(signal).await?;

        info!("Keygate shutdown complete");

        Ok(())
    }

    /// Builds the API server from the loaded configuration.
    fn build_server(&self) -> BinResult<keygate_api::ApiServer> {
        // 1. Identity store: configured roster or the built-in demo users
        let store = match self.config.identities() {
            Some(identities) => {
                let store = MemoryStore::from_identities(identities)?;
                info!(users = store.len(), "Loaded identity roster from configuration");
                store
            }
            None => {
                info!("No users configured, using built-in demo roster");
                MemoryStore::with_demo_users()
            }
        };

        // 2. Token engine
        let engine = TokenEngine::new(self.config.auth.to_token_config())?;

        // 3. API configuration from the server section
        let api_config = ApiConfig::new()
            .with_host(self.config.server.host)
            .with_port(self.config.server.port)
            .with_request_timeout(self.config.server.request_timeout)
            .with_shutdown_timeout(self.config.server.shutdown_timeout);

        let server = ApiServerBuilder::new()
            .config(api_config)
            .verifier(CredentialVerifier::new(Arc::new(store)))
            .tokens(Arc::new(engine))
            .policies(PolicyTable::new())
            .build()?;

        Ok(server)
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the gateway runtime.
pub struct RuntimeBuilder {
    config_path: Option<std::path::PathBuf>,
    config: Option<KeygateConfig>,
    port_override: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: None,
            port_override: None,
        }
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: KeygateConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the bind port from the configuration.
    pub fn port_override(mut self, port: Option<u16>) -> Self {
        self.port_override = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<GatewayRuntime> {
        let mut config = match self.config {
            Some(cfg) => cfg,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::Configuration("No configuration provided".into()))?;

                load_config(&path).map_err(|e| {
                    BinError::Configuration(format!("Failed to load config from {:?}: {}", path, e))
                })?
            }
        };

        if let Some(port) = self.port_override {
            config.server.port = port;
        }

        Ok(GatewayRuntime::new(config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
