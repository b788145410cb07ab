//! User management routes
//!
//! All routes sit behind the bearer gate (applied at router assembly);
//! each operation additionally requires its own permission, so an
//! authenticated caller without the grant gets 403, not 401.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::permissions::{CAN_CREATE_USERS, CAN_DELETE_USERS, CAN_READ_USERS};
use crate::auth::require_permission;
use crate::core::AuthState;

/// User management router
pub fn router() -> Router<AuthState> {
    let read_routes = Router::new()
        .route("/api/users", get(handler::list))
        .route("/api/users/{username}", get(handler::get_by_username))
        .layer(middleware::from_fn(require_permission(CAN_READ_USERS)));

    let create_routes = Router::new()
        .route("/api/users", post(handler::create))
        .layer(middleware::from_fn(require_permission(CAN_CREATE_USERS)));

    let delete_routes = Router::new()
        .route("/api/users/{username}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(CAN_DELETE_USERS)));

    read_routes.merge(create_routes).merge(delete_routes)
}
