//! Authentication API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_sign_up_sets_session_cookie() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/signup",
            json!({ "name": "alice", "password": "password123" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.session.is_some());
    assert_eq!(response.body["id"], json!(1));
    assert_eq!(response.body["name"], json!("alice"));
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("session_id").is_none());

    let snapshot = app.store.snapshot();
    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(app.store.commits(), 1);
}

#[tokio::test]
async fn test_sign_up_with_taken_name_conflicts() {
    let app = TestApp::new();
    app.sign_up("alice").await;

    let response = app
        .post(
            "/api/v1/signup",
            json!({ "name": "alice", "password": "different1" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], json!(10005));
    assert_eq!(app.store.snapshot().users.len(), 1);
}

#[tokio::test]
async fn test_sign_up_with_short_password_lists_field_errors() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/signup",
            json!({ "name": "alice", "password": "short" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], json!(10007));
    let errors = response.body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], json!("password"));
    assert!(errors[0].get("value").is_none());
    assert_eq!(app.store.commits(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post("/api/v1/signup", json!({ "name": "alice" }), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], json!(10002));
}

#[tokio::test]
async fn test_login_replaces_previous_session() {
    let app = TestApp::new();
    let first = app.sign_up("alice").await;

    let response = app
        .post(
            "/api/v1/login",
            json!({ "name": "alice", "password": "password123" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let second = response.session.unwrap();
    assert_ne!(first, second);

    let stale = app.request(Method::GET, "/api/v1/me", None, Some(&first)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let fresh = app.request(Method::GET, "/api/v1/me", None, Some(&second)).await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["name"], json!("alice"));
    assert_eq!(app.store.snapshot().sessions.len(), 1);
}

#[tokio::test]
async fn test_login_failures_do_not_reveal_which_factor() {
    let app = TestApp::new();
    app.sign_up("alice").await;

    let wrong_password = app
        .post(
            "/api/v1/login",
            json!({ "name": "alice", "password": "wrong-password" }),
            None,
        )
        .await;
    let unknown_name = app
        .post(
            "/api/v1/login",
            json!({ "name": "bob", "password": "password123" }),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_name.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_name.body);
    assert!(wrong_password.session.is_none());
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new();

    let missing = app.get("/api/v1/me").await;
    let unknown = app
        .request(Method::GET, "/api/v1/me", None, Some("no-such-session"))
        .await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["code"], json!(10003));
}

#[tokio::test]
async fn test_logout_ends_session_and_clears_cookie() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;

    let response = app
        .request(Method::POST, "/api/v1/logout", None, Some(&session))
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.cleared_session);
    let snapshot = app.store.snapshot();
    assert!(snapshot.sessions.is_empty());
    assert_eq!(snapshot.users[&1].session_id, None);

    let me = app.request(Method::GET, "/api/v1/me", None, Some(&session)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::new();

    let without_cookie = app.request(Method::POST, "/api/v1/logout", None, None).await;
    let unknown = app
        .request(Method::POST, "/api/v1/logout", None, Some("gone"))
        .await;

    assert_eq!(without_cookie.status, StatusCode::NO_CONTENT);
    assert_eq!(unknown.status, StatusCode::NO_CONTENT);
}
