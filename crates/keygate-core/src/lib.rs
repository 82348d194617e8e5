// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # keygate-core
//!
//! Credential verification and token issuance engine for the Keygate
//! authentication gateway.
//!
//! This crate contains the security-critical core:
//!
//! - Identity model and pluggable identity store
//! - Credential verification
//! - JWT claim construction, signing, and validation
//! - Role-based authorization policies
//!
//! Everything here is synchronous and free of shared mutable state: each
//! operation is a pure function of its inputs plus two read-only resources
//! (the identity store and the signing secret).

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod claims;
mod error;
mod identity;
mod policy;
mod store;
mod token;
mod verifier;

pub use claims::Claims;
pub use error::{AuthError, AuthResult};
pub use identity::{Credentials, Identity, PublicIdentity, Role};
pub use policy::{Decision, Policy, PolicyTable, PolicyTableBuilder};
pub use store::{IdentityStore, MemoryStore};
pub use token::{
    IssuedToken, TokenConfig, TokenEngine, DEFAULT_LIFETIME, MIN_SECRET_LEN,
    RECOMMENDED_SECRET_LEN,
};
pub use verifier::CredentialVerifier;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
