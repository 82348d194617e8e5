// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use keygate_core::RECOMMENDED_SECRET_LEN;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    // Check if file exists
    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    // Load and validate configuration
    let config = keygate_config::load_config(config_path).map_err(|e| {
        BinError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    // Collect validation warnings
    let mut warnings: Vec<String> = Vec::new();

    if config.users.is_empty() {
        warnings.push("No users configured; the built-in demo roster will be used".to_string());
    }

    if config.auth.secret.len() < RECOMMENDED_SECRET_LEN {
        warnings.push(format!(
            "auth.secret is shorter than the recommended {} bytes",
            RECOMMENDED_SECRET_LEN
        ));
    }

    if config.auth.validate_issuer && config.auth.issuer.is_empty() {
        warnings.push("auth.validate_issuer is enabled but auth.issuer is empty".to_string());
    }

    // Output results based on format
    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Server: {}", config.server.socket_addr());
            println!(
                "  Users: {}",
                if config.users.is_empty() {
                    "demo roster".to_string()
                } else {
                    config.users.len().to_string()
                }
            );
            println!("  Token lifetime: {:?}", config.auth.lifetime);
            println!("  Issuer check: {}", enabled(config.auth.validate_issuer));
            println!("  Audience check: {}", enabled(config.auth.validate_audience));

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&config)
                        .unwrap_or_else(|_| "(serialization error)".to_string())
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "server": config.server.socket_addr().to_string(),
                    "user_count": config.users.len(),
                    "token_lifetime_secs": config.auth.lifetime.as_secs(),
                    "validate_issuer": config.auth.validate_issuer,
                    "validate_audience": config.auth.validate_audience,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .unwrap_or_else(|_| "(serialization error)".to_string())
            );
        }
    }

    // In strict mode, treat warnings as errors
    if args.strict && !warnings.is_empty() {
        return Err(BinError::Configuration(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
