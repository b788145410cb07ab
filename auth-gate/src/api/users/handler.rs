//! User management handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{password, permissions};
use crate::core::{AppError, AppResult, AuthState};
use crate::db::AuthRepository;
use crate::db::models::{User, UserCreate, UserInfo};

/// List users.
///
/// `User` serializes without the password hash, so the stored records can
/// be returned directly.
pub async fn list(State(state): State<AuthState>) -> AppResult<Json<Vec<User>>> {
    let users = state.repo.list_users().await?;
    Ok(Json(users))
}

/// Get a user by username.
pub async fn get_by_username(
    State(state): State<AuthState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .repo
        .find_user_by_name(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

    let permissions = state
        .role_catalog()
        .effective_permissions(&user)
        .await?
        .into_iter()
        .collect();

    Ok(Json(UserInfo {
        username: user.username,
        roles: user.roles,
        permissions,
        attributes: user.attributes,
    }))
}

/// Create a new user.
///
/// Role assignment is all-or-nothing: one unknown role name fails the
/// request and nothing is persisted.
pub async fn create(
    State(state): State<AuthState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    if payload.username.is_empty() {
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }

    // Strict resolution before anything is written
    let resolved = state.role_catalog().resolve_roles(&payload.roles).await?;

    let hash_pass = password::hash_password(&payload.password)?;

    let user = User {
        username: payload.username,
        hash_pass,
        roles: payload.roles,
        attributes: payload.attributes,
    };
    state.repo.insert_user(user.clone()).await?;

    tracing::info!(username = %user.username, "User created");

    Ok(Json(UserInfo {
        username: user.username,
        roles: user.roles,
        permissions: permissions::merge_permissions(&resolved).into_iter().collect(),
        attributes: user.attributes,
    }))
}

/// Delete a user by username.
pub async fn delete(
    State(state): State<AuthState>,
    Path(username): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = state.repo.delete_user(&username).await?;
    if !removed {
        return Err(AppError::NotFound(format!("User {} not found", username)));
    }

    tracing::info!(username = %username, "User deleted");
    Ok(Json(true))
}
