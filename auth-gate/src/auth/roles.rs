//! Role catalog
//!
//! Resolves role names against the repository and computes effective
//! permissions. Resolution is strict at assignment time (creating a user
//! with an unknown role fails) and permissive at authorization time (a
//! role name that no longer resolves contributes nothing).

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::AppError;
use crate::db::AuthRepository;
use crate::db::models::{Role, User};

/// Read-mostly view over the roles stored in the repository
#[derive(Clone)]
pub struct RoleCatalog {
    repo: Arc<dyn AuthRepository>,
}

impl RoleCatalog {
    pub fn new(repo: Arc<dyn AuthRepository>) -> Self {
        Self { repo }
    }

    /// Resolve role names all-or-nothing.
    ///
    /// Used when roles are assigned (user creation). Any name without a
    /// catalog entry fails the whole call with `UnknownRole`.
    pub async fn resolve_roles(&self, names: &[String]) -> Result<Vec<Role>, AppError> {
        let found = self.repo.find_roles_by_name(names).await?;

        if found.len() != names.len() {
            let known: BTreeSet<&str> = found.iter().map(|r| r.name.as_str()).collect();
            let missing = names
                .iter()
                .find(|n| !known.contains(n.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(AppError::UnknownRole(format!("Unknown role: {}", missing)));
        }

        Ok(found)
    }

    /// Compute the effective permission set for an identity.
    ///
    /// Role names that do not resolve are skipped; a role deleted after
    /// assignment silently reduces privilege instead of failing the
    /// request.
    pub async fn effective_permissions(&self, user: &User) -> Result<BTreeSet<String>, AppError> {
        let found = self.repo.find_roles_by_name(&user.roles).await?;

        if found.len() != user.roles.len() {
            tracing::debug!(
                username = %user.username,
                assigned = user.roles.len(),
                resolved = found.len(),
                "Some assigned roles no longer resolve"
            );
        }

        Ok(crate::auth::permissions::merge_permissions(&found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;

    fn seeded_catalog() -> RoleCatalog {
        let repo = MemoryRepository::new();
        repo.seed_role(Role {
            name: "admin".to_string(),
            permissions: vec!["CanCreateUsers".to_string(), "CanDeleteUsers".to_string()],
        });
        repo.seed_role(Role {
            name: "viewer".to_string(),
            permissions: vec![],
        });
        RoleCatalog::new(Arc::new(repo))
    }

    fn user_with_roles(roles: &[&str]) -> User {
        User {
            username: "alice".to_string(),
            hash_pass: "irrelevant".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            attributes: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn test_resolve_roles_is_all_or_nothing() {
        let catalog = seeded_catalog();

        let ok = catalog
            .resolve_roles(&["admin".to_string(), "viewer".to_string()])
            .await
            .unwrap();
        assert_eq!(ok.len(), 2);

        let err = catalog
            .resolve_roles(&["admin".to_string(), "ghost".to_string()])
            .await;
        assert!(matches!(err, Err(AppError::UnknownRole(_))));
    }

    #[tokio::test]
    async fn test_effective_permissions_skips_unknown_roles() {
        let catalog = seeded_catalog();

        let perms = catalog
            .effective_permissions(&user_with_roles(&["admin", "ghost"]))
            .await
            .unwrap();
        assert_eq!(perms.len(), 2);
        assert!(perms.contains("CanCreateUsers"));
        assert!(perms.contains("CanDeleteUsers"));
    }

    #[tokio::test]
    async fn test_effective_permissions_of_empty_role() {
        let catalog = seeded_catalog();

        let perms = catalog
            .effective_permissions(&user_with_roles(&["viewer"]))
            .await
            .unwrap();
        assert!(perms.is_empty());
    }
}
