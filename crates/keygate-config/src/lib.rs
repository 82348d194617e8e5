// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # keygate-config
//!
//! Configuration schema and loading for the Keygate authentication gateway.
//!
//! Configuration is read from a YAML file, with `${ENV_VAR}` placeholders
//! resolved from the environment before parsing. The one required value is
//! the signing secret; everything else has a sensible default.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! auth:
//!   secret: "${KEYGATE_SECRET}"
//!   lifetime: 30s
//! users:
//!   - id: 1
//!     username: saikiran
//!     password: Saikiran
//!     first_name: Sai
//!     last_name: Kiran
//!     role: Admin
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigLoader};
pub use schema::{AuthSection, KeygateConfig, LogSection, ServerSection, UserEntry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
