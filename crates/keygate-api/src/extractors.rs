// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{extract::FromRequestParts, http::request::Parts, Json};
use serde::de::DeserializeOwned;

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Extracts the `AuthContext` from the request extensions. Returns 401 if
/// the caller is not authenticated.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.subject().unwrap_or("anonymous"))
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .filter(|ctx| !ctx.is_anonymous())
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// Extractor for validated JSON payloads.
///
/// Extracts and deserializes JSON, returning appropriate errors for malformed input.
pub struct ValidatedJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Client IP Extractor
// =============================================================================

/// Extractor for the client IP address.
pub struct ClientIp(pub Option<std::net::IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Try to get from X-Forwarded-For header
        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse().ok());

        if let Some(ip) = forwarded {
            return Ok(ClientIp(Some(ip)));
        }

        // Try to get from X-Real-IP header
        let real_ip = parts
            .headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        if let Some(ip) = real_ip {
            return Ok(ClientIp(Some(ip)));
        }

        // Fall back to AuthContext
        let from_ctx = parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.client_ip);

        Ok(ClientIp(from_ctx))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use keygate_core::{Claims, Identity, Role};

    fn parts_with_context(ctx: AuthContext) -> Parts {
        let mut req = Request::new(());
        req.extensions_mut().insert(ctx);
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_auth_rejects_anonymous() {
        let mut parts = parts_with_context(AuthContext::anonymous());
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_auth_rejects_missing_context() {
        let mut parts = Request::new(()).into_parts().0;
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_auth_accepts_authenticated() {
        let identity = Identity::new(1, "saikiran", "Saikiran", "Sai", "Kiran", Role::Admin);
        let claims = Claims::for_identity(&identity, 30);
        let mut parts = parts_with_context(AuthContext::from_claims(claims));

        let Auth(ctx) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.subject(), Some("1"));
    }

    #[tokio::test]
    async fn test_client_ip_from_forwarded_header() {
        let mut req = Request::new(());
        req.headers_mut()
            .insert("X-Forwarded-For", "10.1.2.3, 192.168.0.1".parse().unwrap());
        let mut parts = req.into_parts().0;

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, Some("10.1.2.3".parse().unwrap()));
    }
}
