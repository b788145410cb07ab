use crate::auth::JwtConfig;

/// Default refresh-token lifetime: 30 days.
const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Runtime configuration for the auth core
///
/// # Environment variables
///
/// All values can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | JWT_SECRET | (generated in debug builds) | Symmetric signing key, min 32 bytes |
/// | JWT_ISSUER | auth-gate | Issuer claim stamped into tokens |
/// | SESSION_LIFETIME_SECS | 604800 | Access-token lifetime (one week) |
/// | CLOCK_SKEW_LEEWAY_SECS | 5 | Tolerance for exp/nbf validation |
/// | REFRESH_TOKEN_TTL_SECS | 2592000 | Refresh-token lifetime (30 days) |
/// | STATIC_GATE_USER | (unset) | Username for the static-credential gate |
/// | STATIC_GATE_PASSWORD_SHA256 | (unset) | Hex SHA-256 of the gate password |
///
/// The static-credential gate is only mounted when both `STATIC_GATE_USER`
/// and `STATIC_GATE_PASSWORD_SHA256` are present; a missing pair is caught
/// at route registration, not at request time.
#[derive(Debug, Clone)]
pub struct Config {
    /// JWT signing and validation configuration
    pub jwt: JwtConfig,
    /// Refresh-token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
    /// Fixed credentials for the static gate, if configured
    pub static_gate: Option<StaticCredentials>,
}

/// Fixed credential pair for the static-credential gate.
///
/// The password is held pre-hashed (hex SHA-256); the plaintext never
/// reaches configuration or logs.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    pub username: String,
    pub password_sha256: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing variables fall back to defaults.
    pub fn from_env() -> Self {
        let static_gate = match (
            std::env::var("STATIC_GATE_USER"),
            std::env::var("STATIC_GATE_PASSWORD_SHA256"),
        ) {
            (Ok(username), Ok(password_sha256)) => Some(StaticCredentials {
                username,
                password_sha256,
            }),
            _ => None,
        };

        Self {
            jwt: JwtConfig::default(),
            refresh_token_ttl_secs: std::env::var("REFRESH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECS),
            static_gate,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
