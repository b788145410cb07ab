//! Auth Gate - authentication and authorization core for request-serving backends
//!
//! # Architecture overview
//!
//! This crate verifies caller identity (password credentials or bearer
//! tokens), computes effective permissions from assigned roles, issues and
//! validates signed session tokens, and gates protected routes on both
//! identity and permission. It exposes `axum` middleware and handlers; the
//! host application mounts them and supplies the persistence backend.
//!
//! # Module structure
//!
//! ```text
//! auth-gate/src/
//! ├── core/          # Configuration, state, errors
//! ├── auth/          # Password hashing, JWT, roles, permissions, middleware
//! ├── db/            # Models and the repository trait
//! ├── tokens/        # Refresh-token lifecycle
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod tokens;
pub mod utils;

// Re-export public types
pub use auth::{Claims, CurrentUser, JwtConfig, JwtError, TokenService};
pub use crate::core::{AppError, AppResult, AuthState, Config, StaticCredentials};
pub use db::{AuthRepository, MemoryRepository};
pub use db::models::{RefreshToken, Role, User};
pub use tokens::{RefreshTokenError, RefreshTokenService};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing events for auth decisions
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
