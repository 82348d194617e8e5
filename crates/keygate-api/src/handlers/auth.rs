// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, ClientIp, ValidatedJson};
use crate::response::{CurrentUserResponse, LoginResponse};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verifies a username/password pair and returns a signed bearer token.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    // Empty fields are ordinary non-matching input; they take the same
    // uniform rejection path as any other bad credential.
    let identity = state
        .verifier()
        .verify(&request.username, &request.password)
        .inspect_err(|_| {
            tracing::info!(
                username = %request.username,
                client_ip = ?client_ip,
                "Login rejected"
            );
        })?;

    let issued = state.tokens().issue(&identity)?;

    tracing::info!(
        user_id = identity.id,
        username = %identity.username,
        client_ip = ?client_ip,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse::new(
        identity.public(),
        issued.token,
        state.tokens().lifetime_secs(),
    )))
}

// =============================================================================
// Current User
// =============================================================================

/// GET /api/v1/auth/me
///
/// Returns the authenticated principal as seen through its token claims.
pub async fn current_user(Auth(ctx): Auth) -> ApiResult<impl IntoResponse> {
    // The Auth extractor guarantees claims are present.
    let claims = ctx
        .claims
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    Ok(Json(CurrentUserResponse {
        subject: claims.subject().to_string(),
        role: claims.role,
        expires_at: claims.exp,
    }))
}
