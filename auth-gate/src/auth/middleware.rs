//! Request gates
//!
//! Axum middleware for the two authentication strategies and for
//! permission checks:
//!
//! - [`require_auth`] - bearer-token gate (session JWT)
//! - [`require_basic_auth`] - static-credential gate (basic auth)
//! - [`require_permission`] - permission check, applied after a gate
//!
//! A gate decides 401 (not authenticated); the permission check decides
//! 403 (authenticated but not authorized). The two are never merged.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use sha2::{Digest, Sha256};

use crate::auth::{AuthMethod, CurrentUser, TokenService};
use crate::core::{AppError, AuthState, StaticCredentials};
use crate::security_log;

/// Bearer-token gate.
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into request extensions. Rejections reach
/// the client as a generic 401; the concrete reason only goes to the
/// security log.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => TokenService::extract_from_header(header)
            .ok_or(AppError::Unauthorized)?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    match state.token_service.validate(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e.into())
        }
    }
}

/// Static-credential gate.
///
/// Compares the basic-auth pair against the one fixed identity in the
/// configuration. The configured password is already hashed; the
/// presented password is hashed with SHA-256 and the digests are compared
/// in constant time.
pub async fn require_basic_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(wanted) = state.config.static_gate.as_ref() else {
        // Route registration skips this gate when no credentials are
        // configured; reaching this branch means a wiring mistake.
        tracing::error!("Static gate invoked without configured credentials");
        return Err(AppError::Unauthorized);
    };

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(header) = header else {
        security_log!("WARN", "basic_auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::Unauthorized);
    };

    let (username, password) = match parse_basic_auth_header(header) {
        Ok(pair) => pair,
        Err(_) => {
            security_log!("WARN", "basic_auth_malformed", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    if !credentials_match(wanted, &username, &password) {
        security_log!("WARN", "basic_auth_rejected", user = username.clone());
        return Err(AppError::Unauthorized);
    }

    security_log!(
        "INFO",
        "basic_auth_accepted",
        user = username.clone(),
        auth_method = AuthMethod::Basic.as_str()
    );

    let user = CurrentUser {
        username,
        permissions: vec![],
        attributes: serde_json::Map::new(),
        auth_method: AuthMethod::Basic,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Permission-check middleware.
///
/// Requires that a gate already attached [`CurrentUser`]; callers without
/// the permission get 403.
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/users", post(handler::create))
///     .layer(middleware::from_fn(require_permission(CAN_CREATE_USERS)));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::Unauthorized)?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    username = user.username.clone(),
                    required_permission = permission
                );
                return Err(AppError::PermissionDenied(permission.to_string()));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Parse an HTTP basic-auth header into `(username, password)`.
///
/// Expected format: `Basic <base64(username:password)>`.
fn parse_basic_auth_header(auth_header: &str) -> Result<(String, String), AppError> {
    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(AppError::Unauthorized)?;

    let decoded = BASE64_STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| AppError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;

    let mut parts = decoded.splitn(2, ':');
    let username = parts.next().ok_or(AppError::Unauthorized)?;
    let password = parts.next().ok_or(AppError::Unauthorized)?;

    Ok((username.to_string(), password.to_string()))
}

/// Compare a presented pair against the configured static credentials.
///
/// The password comparison goes through a fixed-length digest and a
/// constant-time equality check; no early exit on the first differing
/// byte.
fn credentials_match(wanted: &StaticCredentials, username: &str, password: &str) -> bool {
    let presented_digest = Sha256::digest(password.as_bytes());

    let Ok(wanted_digest) = hex::decode(&wanted.password_sha256) else {
        tracing::error!("Configured static-gate password hash is not valid hex");
        return false;
    };

    let digest_ok =
        ring::constant_time::verify_slices_are_equal(&presented_digest, &wanted_digest).is_ok();

    username == wanted.username && digest_ok
}
