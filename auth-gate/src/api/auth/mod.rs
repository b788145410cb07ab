//! Authentication routes
//!
//! - `/api/auth/login`, `/api/auth/refresh`: public (the credential is in
//!   the request body)
//! - `/api/auth/me`, `/api/auth/logout`, `/api/auth/refresh-tokens`:
//!   bearer-gated at router assembly

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::AuthState;

/// Routes that must stay outside the bearer gate
pub fn public_router() -> Router<AuthState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/refresh", post(handler::refresh))
}

/// Routes that require an authenticated session
pub fn router() -> Router<AuthState> {
    Router::new()
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/refresh-tokens", get(handler::list_refresh_tokens))
        .route(
            "/api/auth/refresh-tokens/{id}",
            delete(handler::revoke_refresh_token),
        )
}
