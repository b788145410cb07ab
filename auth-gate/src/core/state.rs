use std::sync::Arc;

use crate::auth::roles::RoleCatalog;
use crate::auth::{JwtError, TokenService};
use crate::core::Config;
use crate::db::AuthRepository;
use crate::tokens::RefreshTokenService;

/// Shared state for handlers and middleware
///
/// Holds the configuration, the persistence backend and the token service.
/// Cloning is shallow (`Arc` all the way down), so the state can be handed
/// to axum's `with_state` and to middleware closures freely.
#[derive(Clone)]
pub struct AuthState {
    /// Runtime configuration
    pub config: Arc<Config>,
    /// Persistence backend (opaque repository)
    pub repo: Arc<dyn AuthRepository>,
    /// JWT issue/validate service
    pub token_service: Arc<TokenService>,
}

impl AuthState {
    /// Create the state from a configuration and a repository backend.
    ///
    /// Fails if the signing secret is unusable (e.g. empty), so a
    /// misconfigured deployment dies at startup rather than on the first
    /// login request.
    pub fn new(config: Config, repo: Arc<dyn AuthRepository>) -> Result<Self, JwtError> {
        let token_service = Arc::new(TokenService::with_config(config.jwt.clone())?);
        Ok(Self {
            config: Arc::new(config),
            repo,
            token_service,
        })
    }

    /// Role catalog view over the repository
    pub fn role_catalog(&self) -> RoleCatalog {
        RoleCatalog::new(self.repo.clone())
    }

    /// Refresh-token lifecycle service
    pub fn refresh_tokens(&self) -> RefreshTokenService {
        RefreshTokenService::new(self.repo.clone(), self.config.refresh_token_ttl_secs)
    }
}
