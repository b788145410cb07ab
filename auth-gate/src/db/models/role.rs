//! Role model

use serde::{Deserialize, Serialize};

/// Named bundle of permissions
///
/// Roles are shared, read-mostly reference data; users hold role names,
/// not copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name
    pub name: String,
    /// Permission names this role grants
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Role {
    pub fn new(name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }
}
