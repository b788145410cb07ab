//! Static-credential gate and bootstrap flow.

mod helpers;

use axum::http::StatusCode;
use helpers::{GATE_PASSWORD, GATE_USER, TestApp, body_json};
use serde_json::json;

use auth_gate::AuthRepository;

#[tokio::test]
async fn bootstrap_with_correct_credentials_creates_admin() {
    let app = TestApp::spawn_empty();

    let response = app
        .request_basic(
            "POST",
            "/api/admin/bootstrap",
            GATE_USER,
            GATE_PASSWORD,
            Some(json!({"username": "root", "password": "first-admin-password"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "root");
    assert_eq!(body["roles"][0], "admin");

    // The bootstrap identity can log in through the normal flow
    let response = app.login("root", "first-admin-password").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let permissions = body["user"]["permissions"].as_array().unwrap();
    assert!(permissions.iter().any(|p| p == "CanCreateUsers"));
}

#[tokio::test]
async fn bootstrap_rejects_wrong_gate_credentials() {
    let app = TestApp::spawn_empty();

    // Wrong password
    let response = app
        .request_basic(
            "POST",
            "/api/admin/bootstrap",
            GATE_USER,
            "not-the-password",
            Some(json!({"username": "root", "password": "pw"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong username
    let response = app
        .request_basic(
            "POST",
            "/api/admin/bootstrap",
            "intruder",
            GATE_PASSWORD,
            Some(json!({"username": "root", "password": "pw"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Missing header entirely
    let response = app
        .request(
            "POST",
            "/api/admin/bootstrap",
            None,
            Some(json!({"username": "root", "password": "pw"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing was created by any of the rejected calls
    assert!(app.repo.find_user_by_name("root").await.unwrap().is_none());
}

#[tokio::test]
async fn bootstrap_refuses_a_populated_store() {
    let app = TestApp::spawn(); // already holds alice and bob

    let response = app
        .request_basic(
            "POST",
            "/api/admin/bootstrap",
            GATE_USER,
            GATE_PASSWORD,
            Some(json!({"username": "root", "password": "pw"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn bearer_token_is_not_accepted_by_the_basic_gate() {
    let app = TestApp::spawn_empty();

    let response = app
        .request(
            "POST",
            "/api/admin/bootstrap",
            Some("some.bearer.token"),
            Some(json!({"username": "root", "password": "pw"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
