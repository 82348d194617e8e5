// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing.
//!
//! # Loading Pipeline
//!
//! 1. Read the YAML file
//! 2. Resolve `${VAR}` environment placeholders
//! 3. Parse into [`KeygateConfig`]
//! 4. Apply environment overrides (`KEYGATE_SECRET`, `KEYGATE_PORT`)
//! 5. Validate and return

use std::env;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::KeygateConfig;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use keygate_config::ConfigLoader;
///
/// let config = ConfigLoader::new().load("keygate.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Whether to resolve `${VAR}` placeholders in the file body.
    resolve_env_vars: bool,
    /// Whether to apply `KEYGATE_*` environment overrides after parsing.
    apply_env_overrides: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            resolve_env_vars: true,
            apply_env_overrides: true,
        }
    }

    /// Disables `${VAR}` placeholder resolution.
    pub fn without_env_vars(mut self) -> Self {
        self.resolve_env_vars = false;
        self
    }

    /// Disables `KEYGATE_*` environment overrides.
    pub fn without_env_overrides(mut self) -> Self {
        self.apply_env_overrides = false;
        self
    }

    /// Loads, processes, and validates a configuration file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<KeygateConfig> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = self.parse(&raw)?;

        if self.apply_env_overrides {
            apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        info!(
            path = %path.display(),
            users = config.users.len(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// Parses configuration from a string.
    pub fn parse(&self, raw: &str) -> ConfigResult<KeygateConfig> {
        let resolved = if self.resolve_env_vars {
            resolve_placeholders(raw)?
        } else {
            raw.to_string()
        };

        Ok(serde_yaml::from_str(&resolved)?)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads a configuration file with default loader settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<KeygateConfig> {
    ConfigLoader::new().load(path)
}

// =============================================================================
// Placeholder Resolution
// =============================================================================

/// Replaces `${VAR}` placeholders with environment variable values.
///
/// An unset variable is an error rather than an empty substitution, so a
/// missing secret fails loudly at startup instead of producing a config
/// that fails validation with a less precise message.
fn resolve_placeholders(raw: &str) -> ConfigResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        let (before, after) = rest.split_at(start);
        out.push_str(before);

        let Some(end) = after.find('}') else {
            // Unterminated placeholder; pass through verbatim.
            out.push_str(after);
            return Ok(out);
        };

        let name = &after[2..end];
        let value =
            env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        out.push_str(&value);

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Applies `KEYGATE_*` environment overrides to a parsed configuration.
fn apply_env_overrides(config: &mut KeygateConfig) -> ConfigResult<()> {
    if let Ok(secret) = env::var("KEYGATE_SECRET") {
        debug!("auth.secret overridden from KEYGATE_SECRET");
        config.auth.secret = secret;
    }
    if let Ok(port) = env::var("KEYGATE_PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| ConfigError::validation(format!("invalid KEYGATE_PORT: {}", port)))?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
