//! Common Test Utilities
//!
//! A router over the in-memory store, driven with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use thread_chat_server::config::{
    AuthSettings, CorsSettings, DatabaseSettings, ServerSettings, Settings,
};
use thread_chat_server::domain::error::DomainError;
use thread_chat_server::domain::services::{FixedClock, IdentityService};
use thread_chat_server::infrastructure::MemoryStore;
use thread_chat_server::startup::{build_router, AppState};

pub const COOKIE: &str = "session_id";

/// Reversible stand-in for Argon2 so tests stay fast.
pub struct PlainIdentity;

impl IdentityService for PlainIdentity {
    fn new_session_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain${}", password))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("plain${}", password))
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        auth: AuthSettings::default(),
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Response status plus its decoded JSON body (`Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub session: Option<String>,
    pub cleared_session: bool,
    pub body: Value,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        let prefix = format!("{}=", COOKIE);
        let value = cookies
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix))
            .map(|rest| rest.split(';').next().unwrap_or_default().to_owned())
            .next();

        Self {
            status,
            cleared_session: value.as_deref() == Some(""),
            session: value.filter(|v| !v.is_empty()),
            body,
        }
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let state = AppState::in_memory(
            store.clone(),
            Arc::new(PlainIdentity),
            Arc::new(clock),
            test_settings(),
        );
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("{}={}", COOKIE, session));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        TestResponse::from_response(response).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value, session: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), session).await
    }

    pub async fn put(&self, uri: &str, body: Value, session: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), Some(session)).await
    }

    pub async fn delete(&self, uri: &str, session: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(session)).await
    }

    /// Sign up `name` and return its session id.
    pub async fn sign_up(&self, name: &str) -> String {
        let response = self
            .post(
                "/api/v1/signup",
                serde_json::json!({ "name": name, "password": "password123" }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.session.expect("session cookie")
    }

    /// Create a thread as `session` and return its id.
    pub async fn create_thread(&self, title: &str, session: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/threads",
                serde_json::json!({ "title": title }),
                Some(session),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
