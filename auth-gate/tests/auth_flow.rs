//! End-to-end flows over the assembled router: login, permission-gated
//! operations, strict role assignment and the refresh-token lifecycle.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, body_json};
use serde_json::json;

use auth_gate::AuthRepository;

#[tokio::test]
async fn login_returns_exact_permission_snapshot() {
    let app = TestApp::spawn();

    let response = app.login("alice", "alice-password").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());

    let mut permissions: Vec<String> = body["user"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    permissions.sort();
    assert_eq!(permissions, vec!["CanCreateUsers", "CanDeleteUsers"]);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn();

    let response = app.login("alice", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown username produces the same status and message shape
    let response = app.login("nobody", "whatever").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_user_requires_the_permission() {
    let app = TestApp::spawn();

    // alice holds CanDeleteUsers
    let alice_token = app.login_token("alice", "alice-password").await;
    let response = app
        .request("DELETE", "/api/users/bob", Some(&alice_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // bob's viewer role grants nothing: authenticated but not authorized
    let app = TestApp::spawn();
    let bob_token = app.login_token("bob", "bob-password").await;
    let response = app
        .request("DELETE", "/api/users/alice", Some(&bob_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // no token at all: not authenticated
    let response = app.request("DELETE", "/api/users/alice", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::spawn();

    let token = app.login_token("alice", "alice-password").await;
    // Flip a character somewhere inside the payload segment
    let dot = token.find('.').unwrap();
    let target = dot + 4;
    let mut bytes = token.into_bytes();
    bytes[target] = if bytes[target] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = app
        .request("GET", "/api/auth/me", Some(&tampered), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_user_with_unknown_role_persists_nothing() {
    let app = TestApp::spawn();
    let token = app.login_token("alice", "alice-password").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "charlie",
                "password": "charlie-password",
                "roles": ["admin", "ghost"]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was written
    let stored = app.repo.find_user_by_name("charlie").await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn created_user_can_log_in() {
    let app = TestApp::spawn();
    let token = app.login_token("alice", "alice-password").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "charlie",
                "password": "charlie-password",
                "roles": ["viewer"],
                "attributes": {"displayName": "Charlie"}
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.login("charlie", "charlie-password").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["attributes"]["displayName"], "Charlie");
    assert_eq!(body["user"]["permissions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::spawn();
    let token = app.login_token("alice", "alice-password").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "bob",
                "password": "another-password",
                "roles": []
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn refresh_rotates_the_presented_token() {
    let app = TestApp::spawn();

    let login = body_json(app.login("alice", "alice-password").await).await;
    let first_refresh = login["refresh_token"].as_str().unwrap().to_string();

    // Exchange the refresh token for a new session
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({"refresh_token": first_refresh})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let second_refresh = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(first_refresh, second_refresh);
    assert!(!body["token"].as_str().unwrap().is_empty());

    // The used token was revoked by rotation
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({"refresh_token": first_refresh})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_tokens_are_listable_and_independently_revocable() {
    let app = TestApp::spawn();

    // Two logins, i.e. two devices
    let login1 = body_json(app.login("alice", "alice-password").await).await;
    let login2 = body_json(app.login("alice", "alice-password").await).await;
    let token1 = login1["refresh_token"].as_str().unwrap().to_string();
    let token2 = login2["refresh_token"].as_str().unwrap().to_string();
    let bearer = login2["token"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/auth/refresh-tokens", Some(&bearer), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&token1.as_str()));
    assert!(ids.contains(&token2.as_str()));

    // Revoke the first; the second keeps working
    let response = app
        .request(
            "DELETE",
            &format!("/api/auth/refresh-tokens/{}", token1),
            Some(&bearer),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({"refresh_token": token1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({"refresh_token": token2})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn me_reflects_token_snapshot() {
    let app = TestApp::spawn();
    let token = app.login_token("alice", "alice-password").await;

    let response = app.request("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"].as_array().unwrap().len(), 1);
    assert_eq!(body["attributes"]["firstName"], "Alice");
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let app = TestApp::spawn();

    let login = body_json(app.login("alice", "alice-password").await).await;
    let bearer = login["token"].as_str().unwrap().to_string();
    let refresh = login["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/logout",
            Some(&bearer),
            Some(json!({"refresh_token": refresh})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({"refresh_token": refresh})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
