//! Admin bootstrap routes
//!
//! Mounted behind the static-credential gate at router assembly; used to
//! create the first admin identity before any bearer token can exist.

mod handler;

use axum::{Router, routing::post};

use crate::core::AuthState;

/// Bootstrap router
pub fn router() -> Router<AuthState> {
    Router::new().route("/api/admin/bootstrap", post(handler::bootstrap))
}
