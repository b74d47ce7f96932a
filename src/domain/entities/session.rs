//! Session entity and repository trait.
//!
//! Maps to the `sessions` table. A session is owned by exactly one user; the
//! user row points back at it through `users.session_id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Represents a login session.
///
/// Maps to the `sessions` table:
/// - id: VARCHAR(64) PRIMARY KEY (UUID string from the identity service)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - created_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user.
    pub fn new(id: impl Into<String>, user_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id,
            created_at,
        }
    }
}

/// Repository trait for Session data access operations.
#[async_trait]
pub trait SessionRepository<Tx: Send>: Send + Sync {
    /// Find a session by id inside a transaction.
    async fn find_by_id(&self, tx: &mut Tx, id: &str) -> Result<Option<Session>, DomainError>;

    /// Insert a new session.
    async fn insert(&self, tx: &mut Tx, session: &Session) -> Result<(), DomainError>;

    /// Delete a session. Deleting an unknown id succeeds.
    async fn delete(&self, tx: &mut Tx, id: &str) -> Result<(), DomainError>;
}
