//! Refresh-token lifecycle
//!
//! Tracks issued refresh tokens per identity: create on login, list for
//! display, revoke explicitly, validate on renewal. Rotation-on-use is
//! handled by the refresh handler: the presented token is revoked and a
//! fresh one issued. Multiple valid tokens per user (one per device) are
//! allowed.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::db::AuthRepository;
use crate::db::models::{RefreshToken, User};
use crate::db::repository::RepoError;

/// Refresh-token validation failures
///
/// The conditions stay distinct because the caller's remediation differs:
/// expired means silent re-login, revoked means forced full
/// re-authentication.
#[derive(Debug, Error)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token expired")]
    Expired,

    #[error("Refresh token revoked")]
    Revoked,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Refresh-token store over the repository
#[derive(Clone)]
pub struct RefreshTokenService {
    repo: Arc<dyn AuthRepository>,
    ttl_secs: i64,
}

impl RefreshTokenService {
    pub fn new(repo: Arc<dyn AuthRepository>, ttl_secs: i64) -> Self {
        Self { repo, ttl_secs }
    }

    /// Issue and persist a fresh token for a user.
    pub async fn create(&self, username: &str) -> Result<RefreshToken, RefreshTokenError> {
        let now = Utc::now();
        let token = RefreshToken {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now + Duration::seconds(self.ttl_secs),
            revoked: false,
        };

        self.repo.insert_refresh_token(token.clone()).await?;

        tracing::debug!(username = %username, token_id = %token.id, "Issued refresh token");
        Ok(token)
    }

    /// All tokens for a user, newest first, including expired and revoked
    /// ones; the caller filters for display.
    pub async fn list(&self, username: &str) -> Result<Vec<RefreshToken>, RefreshTokenError> {
        Ok(self.repo.find_refresh_tokens_by_user(username).await?)
    }

    /// Look up a single token by id.
    pub async fn find(&self, id: &str) -> Result<Option<RefreshToken>, RefreshTokenError> {
        Ok(self.repo.find_refresh_token(id).await?)
    }

    /// Mark a token revoked. Idempotent: revoking an already-revoked
    /// token succeeds.
    pub async fn revoke(&self, id: &str) -> Result<(), RefreshTokenError> {
        let Some(mut token) = self.repo.find_refresh_token(id).await? else {
            return Err(RefreshTokenError::NotFound);
        };

        if !token.revoked {
            token.revoked = true;
            self.repo.update_refresh_token(token).await?;
        }

        Ok(())
    }

    /// Validate a presented token id and resolve its owning identity.
    ///
    /// Revocation is checked before expiry so a revoked-and-expired token
    /// reports the stronger condition.
    pub async fn validate(&self, id: &str) -> Result<User, RefreshTokenError> {
        let Some(token) = self.repo.find_refresh_token(id).await? else {
            return Err(RefreshTokenError::NotFound);
        };

        if token.revoked {
            return Err(RefreshTokenError::Revoked);
        }

        if token.is_expired(Utc::now()) {
            return Err(RefreshTokenError::Expired);
        }

        let Some(user) = self.repo.find_user_by_name(&token.username).await? else {
            // Owner deleted since issuance; the token no longer maps to an
            // identity.
            return Err(RefreshTokenError::NotFound);
        };

        Ok(user)
    }
}
