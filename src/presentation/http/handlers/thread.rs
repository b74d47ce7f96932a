//! Thread Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::{PageResponse, ThreadRequest, ThreadResponse};
use crate::presentation::http::extractors::{CurrentUser, IdPath, JsonBody, PageQuery};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List threads by ascending id after `cursor`
pub async fn list_threads(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<PageResponse<ThreadResponse>>, AppError> {
    let threads = state.threads.list_threads(page).await?;
    Ok(Json(threads.into()))
}

pub async fn get_thread(
    State(state): State<AppState>,
    IdPath(thread_id): IdPath<i64>,
) -> Result<Json<ThreadResponse>, AppError> {
    let thread = state.threads.get_thread(thread_id).await?;
    Ok(Json(thread.into()))
}

pub async fn create_thread(
    State(state): State<AppState>,
    _user: CurrentUser,
    JsonBody(body): JsonBody<ThreadRequest>,
) -> Result<(StatusCode, Json<ThreadResponse>), AppError> {
    let thread = state.threads.create_thread(body.into()).await?;

    Ok((StatusCode::CREATED, Json(thread.into())))
}

/// Rename a thread
pub async fn update_thread(
    State(state): State<AppState>,
    _user: CurrentUser,
    IdPath(thread_id): IdPath<i64>,
    JsonBody(body): JsonBody<ThreadRequest>,
) -> Result<Json<ThreadResponse>, AppError> {
    let thread = state.threads.update_thread(thread_id, body.into()).await?;
    Ok(Json(thread.into()))
}

/// Delete a thread and its comments
pub async fn delete_thread(
    State(state): State<AppState>,
    _user: CurrentUser,
    IdPath(thread_id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    state.threads.delete_thread(thread_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
