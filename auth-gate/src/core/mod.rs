//! Core module - configuration, state and error definitions
//!
//! # Module structure
//!
//! - [`Config`] - runtime configuration
//! - [`AuthState`] - shared state for handlers and middleware
//! - [`AppError`] - application error type

pub mod config;
pub mod error;
pub mod state;

pub use config::{Config, StaticCredentials};
pub use error::{AppError, AppResponse, AppResult};
pub use state::AuthState;
