//! Authentication and authorization module
//!
//! - [`TokenService`] - JWT issue/sign/validate
//! - [`CurrentUser`] - authenticated caller context
//! - [`password`] - credential hashing and verification
//! - [`roles`] - role catalog and permission computation
//! - [`require_auth`] / [`require_basic_auth`] - request gates
//! - [`require_permission`] - permission-check middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod roles;

pub use jwt::{AuthMethod, Claims, CurrentUser, JwtConfig, JwtError, TokenService};
pub use middleware::{require_auth, require_basic_auth, require_permission};
