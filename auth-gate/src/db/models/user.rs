//! User model

use serde::{Deserialize, Serialize};

/// Stored user record
///
/// The password hash never serializes outward; every external
/// representation of a user is produced through `Serialize` and therefore
/// arrives stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// Role names; resolved against the catalog at permission-computation
    /// time, not owned copies
    #[serde(default)]
    pub roles: Vec<String>,
    /// Free-form profile attributes, copied opaquely into issued claims
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Create user payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// User information returned to clients
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}
