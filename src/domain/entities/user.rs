//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

/// Represents a user account in the chat system.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(32) NOT NULL UNIQUE
/// - session_id: VARCHAR(64) NULL (back-reference to the current session)
/// - password: VARCHAR(255) NOT NULL (Argon2 PHC string)
/// - created_at: TIMESTAMPTZ NOT NULL
/// - updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key assigned by storage (0 until inserted)
    pub id: i64,

    /// Unique login name
    pub name: String,

    /// Current session id, if logged in
    pub session_id: Option<String>,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Sign-up or login input as submitted by the caller.
#[derive(Debug, Clone, Validate)]
pub struct UserCandidate {
    #[validate(
        length(min = 1, max = 32, message = "name must be 1-32 characters"),
        custom(function = "validate_no_surrounding_whitespace")
    )]
    pub name: String,

    #[validate(length(min = 8, max = 64, message = "password must be 8-64 characters"))]
    pub password: String,
}

impl UserCandidate {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

/// Login input. Only presence is checked; the stored hash decides the rest.
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

fn validate_no_surrounding_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.trim() != value {
        let mut err = ValidationError::new("whitespace");
        err.message = Some("name must not start or end with whitespace".into());
        return Err(err);
    }
    Ok(())
}

/// Repository trait for User data access operations.
///
/// Lookups return `None` for missing rows; only driver failures are errors.
#[async_trait]
pub trait UserRepository<Tx: Send>: Send + Sync {
    /// Find a user by its unique name inside a transaction.
    async fn find_by_name(&self, tx: &mut Tx, name: &str) -> Result<Option<User>, DomainError>;

    /// Find the user currently owning a session (read-only, no transaction).
    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, DomainError>;

    /// Insert a user and return the assigned id.
    async fn insert(&self, tx: &mut Tx, user: &User) -> Result<i64, DomainError>;

    /// Update session id, password and `updated_at` of an existing user.
    async fn update(&self, tx: &mut Tx, user: &User) -> Result<(), DomainError>;

    /// Clear the session back-reference of whichever user holds `session_id`.
    async fn clear_session(
        &self,
        tx: &mut Tx,
        session_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("alice", "correct horse" ; "plain name")]
    #[test_case("a", "12345678" ; "minimum lengths")]
    #[test_case("abcdefghijklmnopqrstuvwxyz012345", "0123456789012345678901234567890123456789012345678901234567890123" ; "maximum lengths")]
    fn test_candidate_accepts(name: &str, password: &str) {
        assert!(UserCandidate::new(name, password).validate().is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case(" alice" ; "leading whitespace")]
    #[test_case("alice " ; "trailing whitespace")]
    #[test_case("abcdefghijklmnopqrstuvwxyz0123456" ; "too long")]
    fn test_candidate_rejects_name(name: &str) {
        let errors = UserCandidate::new(name, "long enough password")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_candidate_rejects_short_password() {
        let errors = UserCandidate::new("alice", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(!errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "alice".into(),
            session_id: Some("sid".into()),
            password: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
