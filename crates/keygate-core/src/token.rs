// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and validation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::identity::Identity;

/// Minimum signing-secret length in bytes (HS256 key-material floor).
pub const MIN_SECRET_LEN: usize = 16;

/// Recommended signing-secret length in bytes.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Default token lifetime.
///
/// Thirty seconds is the lifetime of the system this replaces; deployments
/// override it through configuration.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(30);

// =============================================================================
// TokenConfig
// =============================================================================

/// Configuration for the token engine.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric signing secret shared by issuance and validation.
    pub secret: String,
    /// Issuer name embedded and checked when `validate_issuer` is on.
    pub issuer: String,
    /// Audience embedded and checked when `validate_audience` is on.
    pub audience: Option<String>,
    /// Token lifetime.
    pub lifetime: Duration,
    /// Whether to check the issuer claim on validation. Off by default,
    /// matching the system this replaces.
    pub validate_issuer: bool,
    /// Whether to check the audience claim on validation. Off by default.
    pub validate_audience: bool,
    /// Clock-skew grace applied to the expiry check.
    pub leeway: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the deployment
            issuer: "keygate".to_string(),
            audience: None,
            lifetime: DEFAULT_LIFETIME,
            validate_issuer: false,
            validate_audience: false,
            leeway: Duration::ZERO,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret and defaults elsewhere.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the issuer and enables issuer validation.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self.validate_issuer = true;
        self
    }

    /// Sets the audience and enables audience validation.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self.validate_audience = true;
        self
    }

    /// Sets the clock-skew grace window.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Validates the configuration.
    ///
    /// A missing or too-short secret is fatal; the process must not start
    /// with a key the signing primitive cannot safely use.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::config("signing secret is not configured"));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::config(format!(
                "signing secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                "signing secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        if self.validate_audience && self.audience.is_none() {
            return Err(AuthError::config(
                "audience validation enabled but no audience configured",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// IssuedToken
// =============================================================================

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact three-part JWT.
    pub token: String,
    /// Expiry instant (Unix timestamp, seconds).
    pub expires_at: i64,
}

// =============================================================================
// TokenEngine
// =============================================================================

/// Issues and validates signed access tokens.
///
/// The engine is created once at startup from validated configuration and
/// shared read-only across all requests; both operations are pure functions
/// of their inputs and the signing secret.
#[derive(Clone)]
pub struct TokenEngine {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenEngine {
    /// Creates an engine from the given configuration.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by the engine itself so the boundary is strict
        // (a token is invalid at exactly `exp`) and leeway is explicit.
        validation.validate_exp = false;

        if config.validate_issuer {
            validation.set_issuer(&[&config.issuer]);
        }
        if config.validate_audience {
            if let Some(ref audience) = config.audience {
                validation.set_audience(&[audience]);
            }
        } else {
            validation.validate_aud = false;
        }

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a signed, expiring token for a verified identity.
    ///
    /// The caller is responsible for having authenticated the identity.
    pub fn issue(&self, identity: &Identity) -> AuthResult<IssuedToken> {
        let mut claims = Claims::for_identity(identity, self.lifetime_secs());
        if self.config.validate_issuer {
            claims = claims.with_issuer(&self.config.issuer);
        }
        if let (true, Some(audience)) = (self.config.validate_audience, &self.config.audience) {
            claims = claims.with_audience(audience);
        }

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::config(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validates a presented token and returns its claims.
    ///
    /// Checks run in order and short-circuit: structure, then signature,
    /// then expiry. Issuer and audience are checked only when the
    /// corresponding configuration flags enable them.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;
        let claims = data.claims;

        // Strictly before `exp` is valid; at `exp` or later is expired.
        // Leeway saturates so an oversized value cannot wrap the deadline
        // negative and expire every token.
        let now = Utc::now().timestamp();
        let leeway = i64::try_from(self.config.leeway.as_secs()).unwrap_or(i64::MAX);
        if now >= claims.exp.saturating_add(leeway) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Returns the configured token lifetime in seconds.
    pub fn lifetime_secs(&self) -> i64 {
        self.config.lifetime.as_secs() as i64
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }
}

impl std::fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEngine")
            .field("issuer", &self.config.issuer)
            .field("lifetime", &self.config.lifetime)
            .field("validate_issuer", &self.config.validate_issuer)
            .field("validate_audience", &self.config.validate_audience)
            .finish()
    }
}

/// Maps jsonwebtoken decode errors onto the core taxonomy.
fn map_decode_error(error: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => AuthError::TokenBadSignature,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        // Issuer/audience mismatches only arise when those checks are
        // enabled; the claim set does not match what this validator expects.
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_) => AuthError::TokenMalformed,
        _ => AuthError::TokenMalformed,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    const TEST_SECRET: &str = "test-secret-key-that-is-long-enough";

    fn admin() -> Identity {
        Identity::new(1, "saikiran", "Saikiran", "Sai", "Kiran", Role::Admin)
    }

    fn user() -> Identity {
        Identity::new(2, "hari", "Hari", "Hari", "Krishna", Role::User)
    }

    fn engine() -> TokenEngine {
        TokenEngine::new(TokenConfig::new(TEST_SECRET)).unwrap()
    }

    /// Signs arbitrary claims with the test secret, bypassing the engine.
    fn raw_token(claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let engine = engine();
        let issued = engine.issue(&admin()).unwrap();

        assert_eq!(issued.token.split('.').count(), 3);

        let claims = engine.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_round_trip_for_every_role() {
        let engine = engine();
        for identity in [admin(), user()] {
            let issued = engine.issue(&identity).unwrap();
            let claims = engine.validate(&issued.token).unwrap();
            assert_eq!(claims.sub, identity.id.to_string());
            assert_eq!(claims.role, identity.role);
        }
    }

    #[test]
    fn test_two_issues_are_independently_valid() {
        let engine = engine();
        let first = engine.issue(&admin()).unwrap();
        let second = engine.issue(&admin()).unwrap();

        let c1 = engine.validate(&first.token).unwrap();
        let c2 = engine.validate(&second.token).unwrap();
        assert_eq!(c1.sub, c2.sub);
        assert_eq!(c1.role, c2.role);
    }

    #[test]
    fn test_expired_at_exactly_exp() {
        let engine = engine();
        let mut claims = Claims::for_identity(&admin(), 0);
        claims.exp = Utc::now().timestamp(); // expires right now

        let result = engine.validate(&raw_token(&claims));
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_valid_before_exp() {
        let engine = engine();
        let claims = Claims::for_identity(&admin(), 5);
        assert!(engine.validate(&raw_token(&claims)).is_ok());
    }

    #[test]
    fn test_expired_in_the_past() {
        let engine = engine();
        let claims = Claims::for_identity(&admin(), -3600);
        let result = engine.validate(&raw_token(&claims));
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_leeway_extends_expiry() {
        let config = TokenConfig::new(TEST_SECRET).with_leeway(Duration::from_secs(30));
        let engine = TokenEngine::new(config).unwrap();

        // Expired two seconds ago, but within the grace window.
        let mut claims = Claims::for_identity(&admin(), 0);
        claims.exp = Utc::now().timestamp() - 2;
        assert!(engine.validate(&raw_token(&claims)).is_ok());
    }

    #[test]
    fn test_oversized_leeway_does_not_wrap() {
        // A leeway beyond i64 seconds must saturate, not wrap the expiry
        // deadline negative.
        let config = TokenConfig::new(TEST_SECRET).with_leeway(Duration::from_secs(u64::MAX));
        let engine = TokenEngine::new(config).unwrap();

        let issued = engine.issue(&admin()).unwrap();
        assert!(engine.validate(&issued.token).is_ok());
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let engine = engine();
        let issued = engine.issue(&admin()).unwrap();

        // Flip one character of the payload section to another base64 char;
        // the section still decodes but no longer matches the signature.
        let parts: Vec<&str> = issued.token.split('.').collect();
        let payload = parts[1];
        let flipped: String = {
            let mut chars: Vec<char> = payload.chars().collect();
            let mid = chars.len() / 2;
            chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
            chars.into_iter().collect()
        };
        let tampered = format!("{}.{}.{}", parts[0], flipped, parts[2]);

        let result = engine.validate(&tampered);
        assert!(matches!(result, Err(AuthError::TokenBadSignature)));
    }

    #[test]
    fn test_spliced_signature_fails() {
        let engine = engine();
        let admin_token = engine.issue(&admin()).unwrap().token;
        let user_token = engine.issue(&user()).unwrap().token;

        // Admin claims with the user token's signature.
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let user_parts: Vec<&str> = user_token.split('.').collect();
        let spliced = format!("{}.{}.{}", admin_parts[0], admin_parts[1], user_parts[2]);

        let result = engine.validate(&spliced);
        assert!(matches!(result, Err(AuthError::TokenBadSignature)));
    }

    #[test]
    fn test_wrong_secret_fails_signature() {
        let issuing = engine();
        let validating =
            TokenEngine::new(TokenConfig::new("another-secret-that-is-long-enough")).unwrap();

        let issued = issuing.issue(&admin()).unwrap();
        let result = validating.validate(&issued.token);
        assert!(matches!(result, Err(AuthError::TokenBadSignature)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let engine = engine();
        assert!(matches!(
            engine.validate("not-a-token"),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(
            engine.validate(""),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(
            engine.validate("a.b.c"),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn test_issuer_validation_disabled_by_default() {
        // Tokens without an issuer claim validate fine by default.
        let engine = engine();
        let issued = engine.issue(&admin()).unwrap();
        let claims = engine.validate(&issued.token).unwrap();
        assert!(claims.iss.is_none());
        assert!(claims.aud.is_none());
    }

    #[test]
    fn test_issuer_validation_when_enabled() {
        let config = TokenConfig::new(TEST_SECRET).with_issuer("keygate");
        let engine = TokenEngine::new(config).unwrap();

        let issued = engine.issue(&admin()).unwrap();
        let claims = engine.validate(&issued.token).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("keygate"));

        // A token without the issuer claim is rejected.
        let bare = raw_token(&Claims::for_identity(&admin(), 30));
        assert!(engine.validate(&bare).is_err());
    }

    #[test]
    fn test_secret_length_rules() {
        assert!(matches!(
            TokenEngine::new(TokenConfig::new("")),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            TokenEngine::new(TokenConfig::new("short")),
            Err(AuthError::Configuration(_))
        ));
        // Exactly the floor is accepted.
        assert!(TokenEngine::new(TokenConfig::new("0123456789abcdef")).is_ok());
    }

    #[test]
    fn test_audience_flag_requires_audience() {
        let config = TokenConfig {
            secret: TEST_SECRET.to_string(),
            validate_audience: true,
            ..Default::default()
        };
        assert!(matches!(
            TokenEngine::new(config),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_lifetime_is_thirty_seconds() {
        let engine = engine();
        assert_eq!(engine.lifetime_secs(), 30);

        let issued = engine.issue(&admin()).unwrap();
        let claims = engine.validate(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 30);
    }
}
