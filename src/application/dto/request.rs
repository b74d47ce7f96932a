//! Request DTOs
//!
//! Data structures for API request bodies. Field rules live on the domain
//! candidates these convert into.

use serde::Deserialize;

use crate::domain::entities::{
    Author, CommentCandidate, CommentPatch, Credentials, ThreadCandidate, UserCandidate,
};

/// Sign-up request
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub password: String,
}

impl From<SignUpRequest> for UserCandidate {
    fn from(req: SignUpRequest) -> Self {
        UserCandidate::new(req.name, req.password)
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Credentials::new(req.name, req.password)
    }
}

/// Create or rename a thread
#[derive(Debug, Deserialize)]
pub struct ThreadRequest {
    pub title: String,
}

impl From<ThreadRequest> for ThreadCandidate {
    fn from(req: ThreadRequest) -> Self {
        ThreadCandidate::new(req.title)
    }
}

/// Create or edit a comment
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    /// New comment on `thread_id` written by `author`.
    pub fn into_candidate(self, thread_id: i64, author: Author) -> CommentCandidate {
        CommentCandidate {
            content: self.content,
            thread_id,
            author,
        }
    }
}

impl From<CommentRequest> for CommentPatch {
    fn from(req: CommentRequest) -> Self {
        CommentPatch::new(req.content)
    }
}
