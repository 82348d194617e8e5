// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! # Schema Structure
//!
//! ```text
//! KeygateConfig
//! ├── server: ServerSection
//! ├── auth: AuthSection
//! ├── users: Vec<UserEntry>
//! └── logging: LogSection
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use keygate_core::{Identity, Role, TokenConfig, MIN_SECRET_LEN};

use crate::error::{ConfigError, ConfigResult};

/// Default API port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default token lifetime (the lifetime of the system this replaces).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(30);

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Keygate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeygateConfig {
    /// HTTP server settings.
    pub server: ServerSection,
    /// Token issuance and validation settings.
    pub auth: AuthSection,
    /// Identity roster. Empty means the built-in demo roster.
    pub users: Vec<UserEntry>,
    /// Logging settings.
    pub logging: LogSection,
}

impl KeygateConfig {
    /// Validates the whole configuration.
    ///
    /// The signing secret is the one fatal requirement: the process must
    /// not start without usable key material.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.auth.secret.is_empty() {
            return Err(ConfigError::validation(
                "auth.secret is required (set it in the config file or via ${KEYGATE_SECRET})",
            ));
        }
        if self.auth.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::validation(format!(
                "auth.secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.auth.validate_audience && self.auth.audience.is_none() {
            return Err(ConfigError::validation(
                "auth.validate_audience is enabled but auth.audience is not set",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::validation("users[].username must be non-empty"));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::validation(format!(
                    "duplicate username in users: {}",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// Returns the identity roster, or `None` when the built-in demo roster
    /// should be used.
    pub fn identities(&self) -> Option<Vec<Identity>> {
        if self.users.is_empty() {
            return None;
        }
        Some(self.users.iter().map(UserEntry::to_identity).collect())
    }
}

// =============================================================================
// ServerSection
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerSection {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// AuthSection
// =============================================================================

/// Token issuance and validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSection {
    /// Symmetric signing secret. Required; minimum 16 bytes.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token lifetime.
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
    /// Issuer name.
    pub issuer: String,
    /// Audience name.
    pub audience: Option<String>,
    /// Whether to validate the issuer claim. Off by default.
    pub validate_issuer: bool,
    /// Whether to validate the audience claim. Off by default.
    pub validate_audience: bool,
    /// Clock-skew grace applied to expiry checks.
    #[serde(with = "humantime_serde")]
    pub leeway: Duration,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the deployment
            lifetime: DEFAULT_TOKEN_LIFETIME,
            issuer: "keygate".to_string(),
            audience: None,
            validate_issuer: false,
            validate_audience: false,
            leeway: Duration::ZERO,
        }
    }
}

impl AuthSection {
    /// Converts this section into the core engine's configuration.
    pub fn to_token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.secret.clone(),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            lifetime: self.lifetime,
            validate_issuer: self.validate_issuer,
            validate_audience: self.validate_audience,
            leeway: self.leeway,
        }
    }
}

// =============================================================================
// UserEntry
// =============================================================================

/// An identity roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEntry {
    /// Stable identifier.
    pub id: u32,
    /// Unique login name.
    pub username: String,
    /// Password secret (cleartext).
    #[serde(skip_serializing)]
    pub password: String,
    /// Display first name.
    #[serde(default)]
    pub first_name: String,
    /// Display last name.
    #[serde(default)]
    pub last_name: String,
    /// Assigned role.
    pub role: Role,
}

impl UserEntry {
    /// Converts the entry into a core identity record.
    pub fn to_identity(&self) -> Identity {
        Identity::new(
            self.id,
            self.username.clone(),
            self.password.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.role,
        )
    }
}

// =============================================================================
// LogSection
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log output format (text, json, compact).
    pub format: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> KeygateConfig {
        let mut config = KeygateConfig::default();
        config.auth.secret = "a-secret-that-is-long-enough".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = KeygateConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.auth.lifetime, Duration::from_secs(30));
        assert!(!config.auth.validate_issuer);
        assert!(!config.auth.validate_audience);
        assert_eq!(config.auth.leeway, Duration::ZERO);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let config = KeygateConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let mut config = KeygateConfig::default();
        config.auth.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_duplicate_usernames_rejected() {
        let mut config = valid_config();
        let entry = UserEntry {
            id: 1,
            username: "sam".to_string(),
            password: "x".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::User,
        };
        config.users = vec![entry.clone(), UserEntry { id: 2, ..entry }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_roster_means_demo_users() {
        assert!(valid_config().identities().is_none());
    }

    #[test]
    fn test_user_entry_to_identity() {
        let entry = UserEntry {
            id: 7,
            username: "sam".to_string(),
            password: "pw-secret".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Example".to_string(),
            role: Role::Admin,
        };
        let identity = entry.to_identity();
        assert_eq!(identity.id, 7);
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.password, "pw-secret");
    }

    #[test]
    fn test_secret_never_serialized() {
        let config = valid_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("a-secret-that-is-long-enough"));
    }

    #[test]
    fn test_audience_flag_without_audience() {
        let mut config = valid_config();
        config.auth.validate_audience = true;
        assert!(config.validate().is_err());

        config.auth.audience = Some("clients".to_string());
        assert!(config.validate().is_ok());
    }
}
