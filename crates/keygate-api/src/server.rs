// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::{Any, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use keygate_core::{CredentialVerifier, PolicyTable, TokenEngine};

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::handlers;
use crate::middleware::{AuthLayer, PolicyLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        // Create middleware layers
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(self.state.tokens.clone()).with_default_public_paths();

        // Build the middleware stack
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(cors)
            .layer(auth);

        let policies = self.state.policies.clone();

        // Routes reachable by any authenticated principal with a listed role
        let user_routes = Router::new()
            .route("/api/v1/auth/me", get(handlers::current_user))
            .route_layer(PolicyLayer::require("UserAndAdmin", policies.clone()));

        // Admin-gated routes
        let admin_routes = Router::new()
            .route("/api/v1/users", get(handlers::list_users))
            .route_layer(PolicyLayer::require("AdminOnly", policies));

        // Create the router
        Router::new()
            // Health endpoint (public)
            .route("/health", get(handlers::health))
            // Auth endpoints
            .route("/api/v1/auth/login", post(handlers::login))
            .merge(user_routes)
            .merge(admin_routes)
            // Apply middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    ///
    /// Once the shutdown signal fires, in-flight connections get
    /// `shutdown_timeout` to drain before the remaining ones are dropped.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let shutdown_timeout = self.config.shutdown_timeout;
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
        let signal = async move {
            shutdown_signal.await;
            let _ = drain_tx.send(());
        };

        let serve = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal);
        let serve = std::future::IntoFuture::into_future(serve);
        tokio::pin!(serve);

        let drain_deadline = async move {
            let _ = drain_rx.await;
            tokio::time::sleep(shutdown_timeout).await;
        };

        tokio::select! {
            result = &mut serve => {
                result.map_err(|e| {
                    crate::error::ApiError::internal(format!("Server error: {}", e))
                })?;
            }
            _ = drain_deadline => {
                warn!(
                    timeout = ?shutdown_timeout,
                    "Shutdown drain deadline exceeded, dropping remaining connections"
                );
            }
        }

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    // Origins; only the wildcard form is supported for now
    if cors.allowed_origins.contains(&"*".to_string()) {
        layer = layer.allow_origin(Any);
    } else {
        layer = layer.allow_origin(Any);
    }

    // Methods
    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    // Headers
    layer.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the credential verifier.
    pub fn verifier(mut self, verifier: CredentialVerifier) -> Self {
        self.state_builder = self.state_builder.verifier(verifier);
        self
    }

    /// Sets the token engine.
    pub fn tokens(mut self, tokens: Arc<TokenEngine>) -> Self {
        self.state_builder = self.state_builder.tokens(tokens);
        self
    }

    /// Sets the policy table.
    pub fn policies(mut self, policies: PolicyTable) -> Self {
        self.state_builder = self.state_builder.policies(policies);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
