// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # keygate-api
//!
//! HTTP API server for the Keygate authentication gateway.
//!
//! This crate provides the thin transport around the core engine: the
//! authentication endpoint, bearer-token middleware, policy enforcement,
//! and error-to-HTTP mapping.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ApiConfig, CorsConfig};
pub use context::AuthContext;
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
