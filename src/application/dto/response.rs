//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::domain::entities::{Comment, Thread, User};
use crate::domain::value_objects::Page;

/// User response. Never carries the password hash or session id.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Thread response
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        Self {
            id: thread.id,
            title: thread.title,
            created_at: thread.created_at.to_rfc3339(),
            updated_at: thread.updated_at.to_rfc3339(),
        }
    }
}

/// Comment author
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
}

/// Comment response
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub thread_id: i64,
    pub author: AuthorResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            thread_id: comment.thread_id,
            author: AuthorResponse {
                id: comment.author.id,
                name: comment.author.name,
            },
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub cursor: i64,
}

impl<S, T: From<S>> From<Page<S>> for PageResponse<T> {
    fn from(page: Page<S>) -> Self {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            has_next: page.has_next,
            cursor: page.cursor,
        }
    }
}
