//! API route modules
//!
//! # Structure
//!
//! - [`auth`] - login, refresh, session and refresh-token endpoints
//! - [`users`] - user management endpoints
//! - [`admin`] - bootstrap endpoint behind the static-credential gate
//!
//! Each domain exposes a `router()`; [`router`] assembles them, wiring
//! the bearer gate in front of protected routes and the static gate in
//! front of the admin routes.

pub mod admin;
pub mod auth;
pub mod users;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, require_basic_auth};
use crate::core::AuthState;

/// Build the full API router for the host to mount.
///
/// The static-credential gate is only wired when credentials are
/// configured; a missing pair is handled here, at registration, so no
/// request can reach a half-configured gate.
pub fn router(state: AuthState) -> Router {
    let public = auth::public_router();

    let protected = Router::new()
        .merge(auth::router())
        .merge(users::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut app = public.merge(protected);

    if state.config.static_gate.is_some() {
        let admin = admin::router().layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ));
        app = app.merge(admin);
    } else {
        tracing::warn!("Static-gate credentials not configured; bootstrap route not mounted");
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
