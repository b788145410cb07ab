//! In-memory repository
//!
//! DashMap-backed implementation of [`AuthRepository`] for tests and
//! embedded hosts. Every mutation is a single entry operation, which
//! keeps concurrent create/revoke for the same user safe without any
//! additional locking.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::db::models::{RefreshToken, Role, User};
use crate::db::repository::{AuthRepository, RepoError, RepoResult};

/// In-memory store keyed by username, role name and token id
#[derive(Debug, Default)]
pub struct MemoryRepository {
    users: DashMap<String, User>,
    roles: DashMap<String, Role>,
    refresh_tokens: DashMap<String, RefreshToken>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role directly, replacing any existing entry.
    ///
    /// Seeding convenience for tests and bootstrap code paths.
    pub fn seed_role(&self, role: Role) {
        self.roles.insert(role.name.clone(), role);
    }

    /// Insert a user directly, replacing any existing entry.
    pub fn seed_user(&self, user: User) {
        self.users.insert(user.username.clone(), user);
    }
}

#[async_trait]
impl AuthRepository for MemoryRepository {
    async fn find_user_by_name(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn find_roles_by_name(&self, names: &[String]) -> RepoResult<Vec<Role>> {
        Ok(names
            .iter()
            .filter_map(|name| self.roles.get(name).map(|r| r.value().clone()))
            .collect())
    }

    async fn insert_user(&self, user: User) -> RepoResult<()> {
        match self.users.entry(user.username.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                user.username
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(user);
                Ok(())
            }
        }
    }

    async fn delete_user(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.remove(username).is_some())
    }

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn insert_role(&self, role: Role) -> RepoResult<()> {
        match self.roles.entry(role.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                role.name
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(role);
                Ok(())
            }
        }
    }

    async fn insert_refresh_token(&self, token: RefreshToken) -> RepoResult<()> {
        self.refresh_tokens.insert(token.id.clone(), token);
        Ok(())
    }

    async fn find_refresh_token(&self, id: &str) -> RepoResult<Option<RefreshToken>> {
        Ok(self.refresh_tokens.get(id).map(|t| t.value().clone()))
    }

    async fn find_refresh_tokens_by_user(&self, username: &str) -> RepoResult<Vec<RefreshToken>> {
        let mut tokens: Vec<RefreshToken> = self
            .refresh_tokens
            .iter()
            .filter(|t| t.username == username)
            .map(|t| t.value().clone())
            .collect();
        tokens.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(tokens)
    }

    async fn update_refresh_token(&self, token: RefreshToken) -> RepoResult<()> {
        match self.refresh_tokens.entry(token.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                entry.insert(token);
                Ok(())
            }
            dashmap::mapref::entry::Entry::Vacant(_) => Err(RepoError::NotFound(format!(
                "Refresh token '{}' not found",
                token.id
            ))),
        }
    }
}
