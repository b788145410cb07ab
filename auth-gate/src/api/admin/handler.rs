//! Bootstrap handler

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::{password, permissions};
use crate::core::{AppError, AuthState};
use crate::db::AuthRepository;
use crate::db::models::{Role, User, UserInfo};
use crate::db::repository::RepoError;

/// Bootstrap request payload
#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub username: String,
    pub password: String,
}

/// Name of the role granted to the bootstrap identity
const ADMIN_ROLE: &str = "admin";

/// Create the initial admin role and user.
///
/// Only works on an empty user store; afterwards user creation goes
/// through the bearer-gated `/api/users` endpoint.
pub async fn bootstrap(
    State(state): State<AuthState>,
    Json(req): Json<BootstrapRequest>,
) -> Result<Json<UserInfo>, AppError> {
    if !state.repo.list_users().await?.is_empty() {
        return Err(AppError::Conflict("Store is already initialized".into()));
    }

    if req.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }

    let admin_role = Role::new(
        ADMIN_ROLE,
        permissions::ALL_PERMISSIONS
            .iter()
            .map(|p| p.to_string())
            .collect(),
    );
    match state.repo.insert_role(admin_role.clone()).await {
        Ok(()) => {}
        // The role may survive from an earlier wipe of the user store
        Err(RepoError::Duplicate(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let hash_pass = password::hash_password(&req.password)?;
    let user = User {
        username: req.username,
        hash_pass,
        roles: vec![ADMIN_ROLE.to_string()],
        attributes: serde_json::Map::new(),
    };
    state.repo.insert_user(user.clone()).await?;

    tracing::info!(username = %user.username, "Bootstrap admin created");

    Ok(Json(UserInfo {
        username: user.username,
        roles: user.roles,
        permissions: admin_role.permissions,
        attributes: user.attributes,
    }))
}
