//! Route Configuration
//!
//! Configures all HTTP routes for the API. Write operations authenticate
//! through the `CurrentUser` extractor in their handlers.

use axum::{routing::get, routing::post, Router};

use super::handlers;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/threads", thread_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::auth::sign_up))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn thread_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::thread::list_threads).post(handlers::thread::create_thread),
        )
        .route(
            "/{thread_id}",
            get(handlers::thread::get_thread)
                .put(handlers::thread::update_thread)
                .delete(handlers::thread::delete_thread),
        )
        .route(
            "/{thread_id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route(
            "/{thread_id}/comments/{comment_id}",
            get(handlers::comment::get_comment)
                .put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
}
