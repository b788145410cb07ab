//! Permission definitions
//!
//! Permissions are flat strings; there is no wildcard or hierarchy
//! semantics. A role bundles a set of permission names, and an identity's
//! effective permissions are the union over its resolvable roles.

use std::collections::BTreeSet;

use crate::db::models::Role;

/// Read user records
pub const CAN_READ_USERS: &str = "CanReadUsers";
/// Create user records
pub const CAN_CREATE_USERS: &str = "CanCreateUsers";
/// Update user records
pub const CAN_UPDATE_USERS: &str = "CanUpdateUsers";
/// Delete user records
pub const CAN_DELETE_USERS: &str = "CanDeleteUsers";

/// All permissions known to this core
pub const ALL_PERMISSIONS: &[&str] = &[
    CAN_READ_USERS,
    CAN_CREATE_USERS,
    CAN_UPDATE_USERS,
    CAN_DELETE_USERS,
];

/// Union the permission sets of the given roles.
///
/// Set semantics make the result independent of role order and of
/// duplicate role entries.
pub fn merge_permissions(roles: &[Role]) -> BTreeSet<String> {
    roles
        .iter()
        .flat_map(|role| role.permissions.iter().cloned())
        .collect()
}

/// Exact-membership permission test; no wildcard or hierarchy semantics.
pub fn has_permission(permissions: &[String], required: &str) -> bool {
    permissions.iter().any(|p| p == required)
}
