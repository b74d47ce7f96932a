//! Comment Handlers
//!
//! Comments are addressed below their thread. A comment id that exists but
//! belongs to another thread answers 404 like a missing one.

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::{CommentRequest, CommentResponse, PageResponse};
use crate::domain::entities::{Author, Comment};
use crate::presentation::http::extractors::{CurrentUser, IdPath, JsonBody, PageQuery};
use crate::shared::error::AppError;
use crate::startup::AppState;

async fn comment_in_thread(
    state: &AppState,
    thread_id: i64,
    comment_id: i64,
) -> Result<Comment, AppError> {
    let comment = state.comments.get_comment(comment_id).await?;
    if comment.thread_id != thread_id {
        return Err(AppError::NotFound(format!(
            "comment {} not found in thread {}",
            comment_id, thread_id
        )));
    }
    Ok(comment)
}

/// List a thread's comments by ascending id after `cursor`
pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(thread_id): IdPath<i64>,
    PageQuery(page): PageQuery,
) -> Result<Json<PageResponse<CommentResponse>>, AppError> {
    let comments = state.comments.list_comments(thread_id, page).await?;
    Ok(Json(comments.into()))
}

pub async fn get_comment(
    State(state): State<AppState>,
    IdPath((thread_id, comment_id)): IdPath<(i64, i64)>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = comment_in_thread(&state, thread_id, comment_id).await?;
    Ok(Json(comment.into()))
}

/// Post a comment as the session user
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(thread_id): IdPath<i64>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let author = Author::new(user.id, user.name);
    let comment = state
        .comments
        .create_comment(body.into_candidate(thread_id, author))
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn update_comment(
    State(state): State<AppState>,
    _user: CurrentUser,
    IdPath((thread_id, comment_id)): IdPath<(i64, i64)>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    comment_in_thread(&state, thread_id, comment_id).await?;
    let comment = state.comments.update_comment(comment_id, body.into()).await?;
    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    _user: CurrentUser,
    IdPath((thread_id, comment_id)): IdPath<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    comment_in_thread(&state, thread_id, comment_id).await?;
    state.comments.delete_comment(comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
