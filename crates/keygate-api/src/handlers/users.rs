// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity roster handlers.

use axum::{extract::State, response::IntoResponse, Json};

use keygate_core::PublicIdentity;

use crate::error::ApiResult;
use crate::state::AppState;

// =============================================================================
// List Users
// =============================================================================

/// GET /api/v1/users
///
/// Returns the identity roster with public attributes only. Admin-gated by
/// the route's policy layer.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users: Vec<PublicIdentity> = state
        .verifier()
        .store()
        .all()
        .iter()
        .map(|identity| identity.public())
        .collect();

    Ok(Json(users))
}
