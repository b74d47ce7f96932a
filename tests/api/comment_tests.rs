//! Comment API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

async fn thread_with_author(app: &TestApp) -> (String, i64) {
    let session = app.sign_up("alice").await;
    let thread_id = app.create_thread("hello", &session).await;
    (session, thread_id)
}

#[tokio::test]
async fn test_comment_author_is_session_user() {
    let app = TestApp::new();
    let (session, thread_id) = thread_with_author(&app).await;

    let response = app
        .post(
            &format!("/api/v1/threads/{}/comments", thread_id),
            json!({ "content": "first!" }),
            Some(&session),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], json!(1));
    assert_eq!(response.body["thread_id"], json!(thread_id));
    assert_eq!(response.body["author"], json!({ "id": 1, "name": "alice" }));
    assert_eq!(response.body["created_at"], response.body["updated_at"]);
}

#[tokio::test]
async fn test_create_comment_requires_session() {
    let app = TestApp::new();
    let (_, thread_id) = thread_with_author(&app).await;

    let response = app
        .post(
            &format!("/api/v1/threads/{}/comments", thread_id),
            json!({ "content": "first!" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_comment_is_invalid() {
    let app = TestApp::new();
    let (session, thread_id) = thread_with_author(&app).await;

    let response = app
        .post(
            &format!("/api/v1/threads/{}/comments", thread_id),
            json!({ "content": "x".repeat(1001) }),
            Some(&session),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], json!("content"));
}

#[tokio::test]
async fn test_list_comments_is_scoped_to_thread() {
    let app = TestApp::new();
    let (session, first) = thread_with_author(&app).await;
    let second = app.create_thread("other", &session).await;
    for (thread_id, content) in [(first, "a"), (second, "b"), (first, "c")] {
        app.post(
            &format!("/api/v1/threads/{}/comments", thread_id),
            json!({ "content": content }),
            Some(&session),
        )
        .await;
    }

    let response = app
        .get(&format!("/api/v1/threads/{}/comments", first))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let contents: Vec<_> = response.body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(contents, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(response.body["has_next"], json!(false));
}

#[tokio::test]
async fn test_comment_from_other_thread_is_not_found() {
    let app = TestApp::new();
    let (session, first) = thread_with_author(&app).await;
    let second = app.create_thread("other", &session).await;
    app.post(
        &format!("/api/v1/threads/{}/comments", first),
        json!({ "content": "a" }),
        Some(&session),
    )
    .await;

    let found = app
        .get(&format!("/api/v1/threads/{}/comments/1", first))
        .await;
    let elsewhere = app
        .get(&format!("/api/v1/threads/{}/comments/1", second))
        .await;
    let delete_elsewhere = app
        .delete(&format!("/api/v1/threads/{}/comments/1", second), &session)
        .await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(elsewhere.status, StatusCode::NOT_FOUND);
    assert_eq!(delete_elsewhere.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.snapshot().comments.len(), 1);
}

#[tokio::test]
async fn test_update_and_delete_comment() {
    let app = TestApp::new();
    let (session, thread_id) = thread_with_author(&app).await;
    app.post(
        &format!("/api/v1/threads/{}/comments", thread_id),
        json!({ "content": "draft" }),
        Some(&session),
    )
    .await;
    let uri = format!("/api/v1/threads/{}/comments/1", thread_id);

    let updated = app.put(&uri, json!({ "content": "final" }), &session).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["content"], json!("final"));
    assert_eq!(updated.body["author"]["name"], json!("alice"));

    let deleted = app.delete(&uri, &session).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
}
