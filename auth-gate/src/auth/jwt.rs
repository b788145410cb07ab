//! JWT token service
//!
//! Issues, signs and validates session tokens. The signing algorithm is
//! pinned to HS256: a presented token declaring any other algorithm is
//! rejected before any of its claims are trusted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::User;

/// Default access-token lifetime: one week.
const DEFAULT_SESSION_LIFETIME_SECS: i64 = 604_800;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Symmetric signing key (should be at least 32 bytes)
    pub secret: String,
    /// Access-token lifetime in seconds
    pub session_lifetime_secs: i64,
    /// Token issuer
    pub issuer: String,
    /// Clock-skew tolerance applied to `exp`/`nbf` validation, in seconds
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or_default(),
            session_lifetime_secs: std::env::var("SESSION_LIFETIME_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SESSION_LIFETIME_SECS),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "auth-gate".to_string()),
            leeway_secs: std::env::var("CLOCK_SKEW_LEEWAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }
}

/// Claims carried inside a session token
///
/// The permission list is a snapshot taken at issuance. A permission
/// revoked later stays effective until the token expires; the bounded
/// lifetime plus the refresh-token revoke path are the mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Not-before timestamp (same instant as `iat`)
    pub nbf: i64,
    /// Expiry timestamp
    pub exp: i64,
    /// Permission snapshot at issuance
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Opaque profile attributes copied from the identity
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Unknown issuer")]
    UnknownIssuer,

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// JWT issue/validate service
#[derive(Clone)]
pub struct TokenService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a token service from a configuration.
    ///
    /// Fails if the signing key is empty, so the error surfaces at startup
    /// instead of on the first sign or validate call.
    pub fn with_config(config: JwtConfig) -> Result<Self, JwtError> {
        if config.secret.is_empty() {
            return Err(JwtError::Signing("signing key must not be empty".into()));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Build claims for an authenticated identity.
    ///
    /// The caller computes the permission snapshot beforehand (via the role
    /// catalog); this service never touches persistence.
    pub fn issue(&self, user: &User, permissions: Vec<String>, now: DateTime<Utc>) -> Claims {
        let expiration = now + Duration::seconds(self.config.session_lifetime_secs);

        Claims {
            sub: user.username.clone(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
            permissions,
            attributes: user.attributes.clone(),
        }
    }

    /// Serialize and sign claims into a compact token string.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Validate a presented token and reconstruct its claims.
    ///
    /// Checks run in order: parse, signature (with the algorithm pinned to
    /// HS256), temporal claims, issuer. The first failure wins.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "nbf", "iss"]);
        validation.validate_nbf = true;
        validation.leeway = self.config.leeway_secs;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::ImmatureSignature => JwtError::NotYetValid,
                    ErrorKind::InvalidIssuer => JwtError::UnknownIssuer,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    // A token declaring a different algorithm than the pinned
                    // one is treated as a signature failure.
                    ErrorKind::InvalidAlgorithm => JwtError::InvalidSignature,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// How the caller was authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Bearer-token gate (session JWT)
    Bearer,
    /// Static-credential gate (basic auth)
    Basic,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Bearer => "bearer",
            AuthMethod::Basic => "basic",
        }
    }
}

/// Authenticated caller context (reconstructed from claims)
///
/// Created by the gates and injected into request extensions; handlers can
/// also take it as an extractor argument.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Username
    pub username: String,
    /// Permission snapshot from the token
    pub permissions: Vec<String>,
    /// Opaque profile attributes from the token
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Which gate authenticated this caller
    pub auth_method: AuthMethod,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            permissions: claims.permissions,
            attributes: claims.attributes,
            auth_method: AuthMethod::Bearer,
        }
    }
}

impl CurrentUser {
    /// Exact-membership check against the token's permission snapshot.
    pub fn has_permission(&self, permission: &str) -> bool {
        crate::auth::permissions::has_permission(&self.permissions, permission)
    }
}
