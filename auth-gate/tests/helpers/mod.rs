//! Shared test harness: seeded state and request helpers over the
//! assembled router.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use base64::prelude::*;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tower::ServiceExt;

use auth_gate::auth::password::hash_password;
use auth_gate::{
    AuthState, Config, JwtConfig, MemoryRepository, Role, StaticCredentials, User, api,
};

/// Static-gate credentials used by the test configuration
pub const GATE_USER: &str = "installer";
pub const GATE_PASSWORD: &str = "bootstrap-secret";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
}

impl TestApp {
    /// Router over a store seeded with the standard fixtures:
    /// alice (role `admin`: CanCreateUsers + CanDeleteUsers) and
    /// bob (role `viewer`: no permissions).
    pub fn spawn() -> Self {
        let repo = Arc::new(MemoryRepository::new());

        repo.seed_role(Role::new(
            "admin",
            vec!["CanCreateUsers".to_string(), "CanDeleteUsers".to_string()],
        ));
        repo.seed_role(Role::new("viewer", vec![]));

        let mut attributes = serde_json::Map::new();
        attributes.insert("firstName".to_string(), "Alice".into());
        repo.seed_user(User {
            username: "alice".to_string(),
            hash_pass: hash_password("alice-password").unwrap(),
            roles: vec!["admin".to_string()],
            attributes,
        });
        repo.seed_user(User {
            username: "bob".to_string(),
            hash_pass: hash_password("bob-password").unwrap(),
            roles: vec!["viewer".to_string()],
            attributes: serde_json::Map::new(),
        });

        Self::with_repo(repo)
    }

    /// Router over an empty store (bootstrap scenarios).
    pub fn spawn_empty() -> Self {
        Self::with_repo(Arc::new(MemoryRepository::new()))
    }

    fn with_repo(repo: Arc<MemoryRepository>) -> Self {
        let state = AuthState::new(test_config(), repo.clone()).unwrap();
        Self {
            router: api::router(state),
            repo,
        }
    }

    /// Send a request, optionally with a bearer token and a JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request authenticated with HTTP basic auth.
    pub async fn request_basic(
        &self,
        method: &str,
        uri: &str,
        username: &str,
        password: &str,
        body: Option<Value>,
    ) -> Response {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", username, password));
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Basic {}", encoded));
        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({"username": username, "password": password})),
        )
        .await
    }

    /// Login and return the signed session token.
    pub async fn login_token(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = body_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }
}

fn test_config() -> Config {
    Config {
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            session_lifetime_secs: 3600,
            issuer: "auth-gate-tests".to_string(),
            leeway_secs: 5,
        },
        refresh_token_ttl_secs: 3600,
        static_gate: Some(StaticCredentials {
            username: GATE_USER.to_string(),
            password_sha256: hex::encode(Sha256::digest(GATE_PASSWORD.as_bytes())),
        }),
    }
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
