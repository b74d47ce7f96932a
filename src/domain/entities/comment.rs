//! Comment entity and repository trait.
//!
//! Maps to the `comments` table. Every comment belongs to exactly one thread
//! and references its author in `users`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::value_objects::{Identified, Page};

/// The author of a comment as projected from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Author {
    #[validate(range(min = 1, message = "author id must be positive"))]
    pub id: i64,

    pub name: String,
}

impl Author {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Represents a comment posted on a thread.
///
/// Maps to the `comments` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - content: TEXT NOT NULL
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - thread_id: BIGINT NOT NULL REFERENCES threads(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL
/// - updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub thread_id: i64,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Comment {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Paginated projection of a thread's comments.
pub type CommentList = Page<Comment>;

/// Caller-supplied fields for a new comment.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CommentCandidate {
    #[validate(length(min = 1, max = 1000, message = "content must be 1-1000 characters"))]
    pub content: String,

    #[validate(range(min = 1, message = "thread id must be positive"))]
    pub thread_id: i64,

    #[validate(nested)]
    pub author: Author,
}

/// Caller-supplied fields for editing a comment.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CommentPatch {
    #[validate(length(min = 1, max = 1000, message = "content must be 1-1000 characters"))]
    pub content: String,
}

impl CommentPatch {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Repository trait for Comment data access operations.
#[async_trait]
pub trait CommentRepository<Tx: Send>: Send + Sync {
    /// List comments of a thread with `id > after`, ascending by id.
    async fn list_by_thread(
        &self,
        thread_id: i64,
        after: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError>;

    /// Get a comment by id outside of any transaction.
    async fn get(&self, id: i64) -> Result<Option<Comment>, DomainError>;

    /// Find a comment by id inside a transaction.
    async fn find_by_id(&self, tx: &mut Tx, id: i64) -> Result<Option<Comment>, DomainError>;

    /// Insert a comment and return the assigned id.
    async fn insert(&self, tx: &mut Tx, comment: &Comment) -> Result<i64, DomainError>;

    /// Set content and `updated_at` of an existing comment, returning the
    /// stored row.
    async fn update(
        &self,
        tx: &mut Tx,
        id: i64,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, DomainError>;

    /// Delete a comment.
    async fn delete(&self, tx: &mut Tx, id: i64) -> Result<(), DomainError>;
}
