//! Thread entity and repository trait.
//!
//! Maps to the `threads` table. A thread is the parent of zero or more
//! comments; deleting it removes its comments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;
use crate::domain::value_objects::{Identified, Page};

/// Represents a discussion thread.
///
/// Maps to the `threads` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - title: VARCHAR(100) NOT NULL UNIQUE
/// - created_at: TIMESTAMPTZ NOT NULL
/// - updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Thread {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Paginated projection of threads.
pub type ThreadList = Page<Thread>;

/// Caller-supplied thread fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ThreadCandidate {
    #[validate(
        length(min = 1, max = 100, message = "title must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
}

impl ThreadCandidate {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Repository trait for Thread data access operations.
#[async_trait]
pub trait ThreadRepository<Tx: Send>: Send + Sync {
    /// List threads with `id > after`, ascending by id, at most `limit` rows.
    async fn list(&self, after: i64, limit: i64) -> Result<Vec<Thread>, DomainError>;

    /// Get a thread by id outside of any transaction.
    async fn get(&self, id: i64) -> Result<Option<Thread>, DomainError>;

    /// Find a thread by id inside a transaction.
    async fn find_by_id(&self, tx: &mut Tx, id: i64) -> Result<Option<Thread>, DomainError>;

    /// Find a thread by its unique title inside a transaction.
    async fn find_by_title(&self, tx: &mut Tx, title: &str)
        -> Result<Option<Thread>, DomainError>;

    /// Insert a thread and return the assigned id.
    async fn insert(&self, tx: &mut Tx, thread: &Thread) -> Result<i64, DomainError>;

    /// Set title and `updated_at` of an existing thread, returning the
    /// stored row.
    async fn update(
        &self,
        tx: &mut Tx,
        id: i64,
        title: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Thread, DomainError>;

    /// Delete a thread (and, through the schema, its comments).
    async fn delete(&self, tx: &mut Tx, id: i64) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Rust" ; "plain title")]
    #[test_case("a" ; "single character")]
    #[test_case(" Rust in 2026 " ; "surrounding whitespace kept")]
    fn test_candidate_accepts(title: &str) {
        assert!(ThreadCandidate::new(title).validate().is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "spaces only")]
    #[test_case("\t\n" ; "tabs and newlines")]
    fn test_candidate_rejects_title(title: &str) {
        let errors = ThreadCandidate::new(title).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_candidate_rejects_long_title() {
        let errors = ThreadCandidate::new("x".repeat(101)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
