//! Refresh token model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored refresh token
///
/// The id is an opaque identifier; possession of it is the credential.
/// A token stops authorizing renewal when it expires or when the revoked
/// flag is set, whichever comes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Opaque token identifier
    pub id: String,
    /// Owning username
    pub username: String,
    /// Issuance timestamp
    pub issued_at: DateTime<Utc>,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Revocation flag
    pub revoked: bool,
}

impl RefreshToken {
    /// Whether the token has passed its expiry at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
