// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # keygate-bin
//!
//! CLI binary for the Keygate authentication gateway.
//!
//! This crate provides the main binary entry point for Keygate, including:
//!
//! - CLI argument parsing with clap
//! - Gateway runtime orchestration
//! - Graceful shutdown handling
//! - Logging initialization
//! - Command implementations (run, validate, version)
//!
//! ## Usage
//!
//! ```bash
//! # Start the gateway (default command)
//! keygate
//!
//! # Start with custom config
//! keygate -c /etc/keygate/config.yaml
//!
//! # Validate configuration
//! keygate validate
//!
//! # Show version
//! keygate version
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{GatewayRuntime, RuntimeBuilder};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
