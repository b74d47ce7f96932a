//! Identity port: session id generation and password hashing.

use crate::domain::error::DomainError;

/// Generates session identifiers and hashes/verifies credentials.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityService: Send + Sync {
    /// New collision-resistant session id. Callers must still check storage.
    fn new_session_id(&self) -> String;

    /// Hash a plain-text password for storage.
    fn hash_password(&self, password: &str) -> Result<String, DomainError>;

    /// Check a plain-text password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
