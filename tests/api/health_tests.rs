//! Health Check API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_version() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], json!("healthy"));
    assert_eq!(
        response.body["version"],
        json!(env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "alive" }));
}

#[tokio::test]
async fn test_readiness_reports_storage() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_ne!(response.body["storage"]["status"], json!("unhealthy"));
}
