//! Authentication handlers
//!
//! Login, token refresh, logout and refresh-token management.

use std::time::Duration;

use axum::{Json, extract::Path, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::permissions::CAN_DELETE_USERS;
use crate::auth::{CurrentUser, password};
use crate::core::{AppError, AuthState};
use crate::db::AuthRepository;
use crate::db::models::{RefreshToken, User, UserInfo};
use crate::security_log;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login (and refresh) response with the signed session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

/// Refresh request payload
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request payload
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke alongside the session, if the client holds
    /// one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Login handler
///
/// Verifies credentials, snapshots the caller's effective permissions and
/// returns a signed session token plus a fresh refresh token. Unknown
/// username and wrong password produce the same response.
pub async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.repo.find_user_by_name(&req.username).await?;

    // Fixed delay before acting on the lookup result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => {
            let password_valid = password::verify_password(&req.password, &user.hash_pass)?;
            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = req.username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::InvalidCredentials);
            }
            user
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::InvalidCredentials);
        }
    };

    issue_session(&state, user).await
}

/// Token refresh handler
///
/// Validates the presented refresh token, rotates it and issues a new
/// session token with a permission snapshot recomputed from the current
/// catalog.
pub async fn refresh(
    State(state): State<AuthState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let refresh_tokens = state.refresh_tokens();

    let user = match refresh_tokens.validate(&req.refresh_token).await {
        Ok(user) => user,
        Err(e) => {
            security_log!("WARN", "refresh_failed", error = format!("{}", e));
            return Err(e.into());
        }
    };

    // Rotation: the presented token stops working the moment its
    // replacement exists
    refresh_tokens.revoke(&req.refresh_token).await?;

    issue_session(&state, user).await
}

/// Issue a session token and a refresh token for an authenticated user.
async fn issue_session(
    state: &AuthState,
    user: User,
) -> Result<Json<LoginResponse>, AppError> {
    let permissions: Vec<String> = state
        .role_catalog()
        .effective_permissions(&user)
        .await?
        .into_iter()
        .collect();

    let claims = state.token_service.issue(&user, permissions.clone(), Utc::now());
    let token = state.token_service.sign(&claims)?;

    let refresh_token = state.refresh_tokens().create(&user.username).await?;

    security_log!(
        "INFO",
        "login_succeeded",
        username = user.username.clone()
    );
    tracing::info!(username = %user.username, "Session issued");

    Ok(Json(LoginResponse {
        token,
        refresh_token: refresh_token.id,
        user: UserInfo {
            username: user.username,
            roles: user.roles,
            permissions,
            attributes: user.attributes,
        },
    }))
}

/// Current session info
///
/// Roles reflect the stored record; permissions are the snapshot embedded
/// in the presented token.
pub async fn me(
    State(state): State<AuthState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    let stored = state
        .repo
        .find_user_by_name(&user.username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.username)))?;

    Ok(Json(UserInfo {
        username: stored.username,
        roles: stored.roles,
        permissions: user.permissions,
        attributes: user.attributes,
    }))
}

/// Logout handler
///
/// Session tokens lapse on their own; logout revokes the caller's refresh
/// token so the session cannot be renewed.
pub async fn logout(
    State(state): State<AuthState>,
    user: CurrentUser,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<bool>, AppError> {
    if let Some(id) = req.refresh_token {
        let refresh_tokens = state.refresh_tokens();
        match refresh_tokens.find(&id).await? {
            Some(token) if token.username == user.username => {
                refresh_tokens.revoke(&id).await?;
            }
            Some(_) => {
                security_log!(
                    "WARN",
                    "logout_foreign_token",
                    username = user.username.clone()
                );
                return Err(AppError::PermissionDenied("not the token owner".into()));
            }
            None => {}
        }
    }

    tracing::info!(username = %user.username, "User logged out");
    Ok(Json(true))
}

/// List the caller's refresh tokens, newest first.
///
/// Expired and revoked tokens are included; clients filter for display.
pub async fn list_refresh_tokens(
    State(state): State<AuthState>,
    user: CurrentUser,
) -> Result<Json<Vec<RefreshToken>>, AppError> {
    let tokens = state.refresh_tokens().list(&user.username).await?;
    Ok(Json(tokens))
}

/// Revoke one refresh token.
///
/// Owners may revoke their own tokens; `CanDeleteUsers` may revoke
/// anyone's. Revoking an already-revoked token succeeds.
pub async fn revoke_refresh_token(
    State(state): State<AuthState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let refresh_tokens = state.refresh_tokens();

    let token = refresh_tokens
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;

    if token.username != user.username && !user.has_permission(CAN_DELETE_USERS) {
        security_log!(
            "WARN",
            "revoke_denied",
            username = user.username.clone(),
            token_owner = token.username.clone()
        );
        return Err(AppError::PermissionDenied(CAN_DELETE_USERS.to_string()));
    }

    refresh_tokens.revoke(&id).await?;

    security_log!(
        "INFO",
        "refresh_token_revoked",
        username = user.username.clone(),
        token_id = id.clone()
    );
    Ok(Json(true))
}
