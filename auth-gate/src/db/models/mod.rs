//! Data models

pub mod refresh_token;
pub mod role;
pub mod user;

pub use refresh_token::RefreshToken;
pub use role::Role;
pub use user::{User, UserCreate, UserInfo};
