// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthLayer`]: bearer token authentication
//! - [`PolicyLayer`]: named authorization policy enforcement

mod auth;
mod policy;

pub use auth::{AuthLayer, AuthMiddleware};
pub use policy::{PolicyLayer, PolicyMiddleware};
