//! Repository trait
//!
//! The persistence collaborator consumed by this core. Records are read
//! and written as whole documents; each mutation is a single atomic
//! operation keyed by username or token id, so the core needs no
//! in-process locking of its own.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::{RefreshToken, Role, User};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence operations this core depends on
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Find a user by username
    async fn find_user_by_name(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find every role whose name appears in `names`; missing names are
    /// simply absent from the result
    async fn find_roles_by_name(&self, names: &[String]) -> RepoResult<Vec<Role>>;

    /// Insert a new user; duplicate usernames fail with `Duplicate`
    async fn insert_user(&self, user: User) -> RepoResult<()>;

    /// Delete a user by username; returns whether a record was removed
    async fn delete_user(&self, username: &str) -> RepoResult<bool>;

    /// List stored usernames
    async fn list_users(&self) -> RepoResult<Vec<User>>;

    /// Insert a new role; duplicate names fail with `Duplicate`
    async fn insert_role(&self, role: Role) -> RepoResult<()>;

    /// Persist a freshly issued refresh token
    async fn insert_refresh_token(&self, token: RefreshToken) -> RepoResult<()>;

    /// Look up a refresh token by id
    async fn find_refresh_token(&self, id: &str) -> RepoResult<Option<RefreshToken>>;

    /// All refresh tokens ever issued to a user, including expired and
    /// revoked ones
    async fn find_refresh_tokens_by_user(&self, username: &str) -> RepoResult<Vec<RefreshToken>>;

    /// Replace the stored record for a token id (single-document update)
    async fn update_refresh_token(&self, token: RefreshToken) -> RepoResult<()>;
}
