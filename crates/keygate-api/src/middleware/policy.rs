// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization policy middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use keygate_core::{AuthError, PolicyTable};

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// PolicyLayer
// =============================================================================

/// Layer enforcing a named authorization policy on a route.
///
/// Evaluates the policy against the authenticated claims placed in the
/// request extensions by [`AuthLayer`](crate::middleware::AuthLayer).
/// Anonymous requests are rejected with 401, denied principals with 403.
#[derive(Clone)]
pub struct PolicyLayer {
    policy_name: Option<Arc<str>>,
    policies: PolicyTable,
}

impl PolicyLayer {
    /// Creates a layer enforcing the named policy.
    pub fn require(name: impl Into<Arc<str>>, policies: PolicyTable) -> Self {
        Self {
            policy_name: Some(name.into()),
            policies,
        }
    }

    /// Creates a layer enforcing the table's default policy.
    pub fn default_policy(policies: PolicyTable) -> Self {
        Self {
            policy_name: None,
            policies,
        }
    }
}

impl<S> Layer<S> for PolicyLayer {
    type Service = PolicyMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PolicyMiddleware {
            inner,
            policy_name: self.policy_name.clone(),
            policies: self.policies.clone(),
        }
    }
}

// =============================================================================
// PolicyMiddleware
// =============================================================================

/// Middleware for policy enforcement.
#[derive(Clone)]
pub struct PolicyMiddleware<S> {
    inner: S,
    policy_name: Option<Arc<str>>,
    policies: PolicyTable,
}

impl<S> Service<Request<Body>> for PolicyMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy_name = self.policy_name.clone();
        let policies = self.policies.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Get auth context from request extensions
            let auth_ctx = req.extensions().get::<AuthContext>().cloned();

            let claims = match auth_ctx.as_ref().and_then(|ctx| ctx.claims.as_ref()) {
                Some(claims) => claims,
                None => {
                    tracing::warn!("No authenticated principal, denying access");
                    return Ok(
                        ApiError::unauthorized("Authentication required").into_response()
                    );
                }
            };

            let decision = policies.evaluate(policy_name.as_deref(), claims);

            if decision.is_allowed() {
                inner.call(req).await
            } else {
                tracing::warn!(
                    subject = %claims.subject(),
                    role = %claims.role.as_str(),
                    policy = policy_name.as_deref().unwrap_or("<default>"),
                    "Policy denied request"
                );
                Ok(ApiError::from(AuthError::Denied).into_response())
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::{Claims, Identity, Role};

    fn request_with_role(role: Role) -> Request<Body> {
        let identity = Identity::new(1, "test", "pw", "Test", "User", role);
        let claims = Claims::for_identity(&identity, 30);
        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(AuthContext::from_claims(claims));
        req
    }

    fn ok_service(
    ) -> tower::util::BoxCloneService<Request<Body>, Response, std::convert::Infallible> {
        tower::util::BoxCloneService::new(tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
        }))
    }

    #[tokio::test]
    async fn test_admin_only_allows_admin() {
        let layer = PolicyLayer::require("AdminOnly", PolicyTable::new());
        let mut svc = layer.layer(ok_service());

        let resp = svc.call(request_with_role(Role::Admin)).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_only_denies_user() {
        let layer = PolicyLayer::require("AdminOnly", PolicyTable::new());
        let mut svc = layer.layer(ok_service());

        let resp = svc.call(request_with_role(Role::User)).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_denial_carries_core_error_mapping() {
        use http_body_util::BodyExt;

        let layer = PolicyLayer::require("AdminOnly", PolicyTable::new());
        let mut svc = layer.layer(ok_service());

        let resp = svc.call(request_with_role(Role::User)).await.unwrap();
        let expected = ApiError::from(AuthError::Denied);
        assert_eq!(resp.status(), expected.status_code());

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: crate::error::ErrorResponseBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, expected.error_code());
        assert_eq!(body.error.message, expected.user_message());
    }

    #[tokio::test]
    async fn test_user_and_admin_allows_both() {
        for role in [Role::User, Role::Admin] {
            let layer = PolicyLayer::require("UserAndAdmin", PolicyTable::new());
            let mut svc = layer.layer(ok_service());

            let resp = svc.call(request_with_role(role)).await.unwrap();
            assert_eq!(resp.status(), axum::http::StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_anonymous_rejected() {
        let layer = PolicyLayer::require("AdminOnly", PolicyTable::new());
        let mut svc = layer.layer(ok_service());

        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(AuthContext::anonymous());

        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_policy_denies() {
        let layer = PolicyLayer::require("NoSuchPolicy", PolicyTable::new());
        let mut svc = layer.layer(ok_service());

        let resp = svc.call(request_with_role(Role::Admin)).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
