//! Thread API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_thread_requires_session() {
    let app = TestApp::new();

    let response = app
        .post("/api/v1/threads", json!({ "title": "hello" }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.snapshot().threads.is_empty());
}

#[tokio::test]
async fn test_create_and_get_thread() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;

    let id = app.create_thread("hello", &session).await;
    let response = app.get(&format!("/api/v1/threads/{}", id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], json!("hello"));
    assert_eq!(response.body["created_at"], response.body["updated_at"]);
}

#[tokio::test]
async fn test_duplicate_title_conflicts() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;
    app.create_thread("hello", &session).await;

    let response = app
        .post("/api/v1/threads", json!({ "title": "hello" }), Some(&session))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.store.snapshot().threads.len(), 1);
}

#[tokio::test]
async fn test_blank_title_is_invalid() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;

    let response = app
        .post("/api/v1/threads", json!({ "title": "" }), Some(&session))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], json!("title"));
}

#[tokio::test]
async fn test_whitespace_title_is_invalid() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;

    let response = app
        .post("/api/v1/threads", json!({ "title": "   " }), Some(&session))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], json!("title"));
    assert!(app.store.snapshot().threads.is_empty());
}

#[tokio::test]
async fn test_list_threads_pages_by_cursor() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;
    for i in 0..25 {
        app.create_thread(&format!("thread {}", i), &session).await;
    }

    let first = app.get("/api/v1/threads").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["items"].as_array().unwrap().len(), 20);
    assert_eq!(first.body["has_next"], json!(true));
    assert_eq!(first.body["cursor"], json!(20));

    let second = app.get("/api/v1/threads?cursor=20").await;
    assert_eq!(second.body["items"].as_array().unwrap().len(), 5);
    assert_eq!(second.body["has_next"], json!(false));
    assert_eq!(second.body["cursor"], json!(0));
    assert_eq!(second.body["items"][0]["id"], json!(21));
}

#[tokio::test]
async fn test_list_threads_rejects_bad_paging() {
    let app = TestApp::new();

    let too_large = app.get("/api/v1/threads?limit=101").await;
    let not_a_number = app.get("/api/v1/threads?limit=many").await;

    assert_eq!(too_large.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_a_number.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_listing_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/v1/threads").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_thread_renames() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;
    let id = app.create_thread("hello", &session).await;

    let response = app
        .put(
            &format!("/api/v1/threads/{}", id),
            json!({ "title": "renamed" }),
            &session,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], json!("renamed"));
    assert_eq!(app.store.snapshot().threads[&id].title, "renamed");
}

#[tokio::test]
async fn test_update_missing_thread_is_not_found() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;

    let response = app
        .put("/api/v1/threads/42", json!({ "title": "renamed" }), &session)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_thread_removes_its_comments() {
    let app = TestApp::new();
    let session = app.sign_up("alice").await;
    let id = app.create_thread("hello", &session).await;
    app.post(
        &format!("/api/v1/threads/{}/comments", id),
        json!({ "content": "first" }),
        Some(&session),
    )
    .await;

    let response = app
        .delete(&format!("/api/v1/threads/{}", id), &session)
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let snapshot = app.store.snapshot();
    assert!(snapshot.threads.is_empty());
    assert!(snapshot.comments.is_empty());

    let again = app
        .delete(&format!("/api/v1/threads/{}", id), &session)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new();

    let response = app.get("/api/v1/threads/abc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
