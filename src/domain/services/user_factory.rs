//! Builds new `User` aggregates from sign-up input.

use chrono::{DateTime, Utc};

use crate::domain::entities::{User, UserCandidate};
use crate::domain::error::DomainError;
use crate::domain::services::IdentityService;
use crate::shared::validation::validate_input;

/// Domain service enforcing the name/password rules before a user exists.
pub struct UserFactory;

impl UserFactory {
    /// Validate the candidate and produce an unsaved user with a hashed
    /// password. The id is assigned on insert; the session is attached later.
    pub fn create(
        candidate: &UserCandidate,
        identity: &dyn IdentityService,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        validate_input(candidate)?;
        let password = identity.hash_password(&candidate.password)?;

        Ok(User {
            id: 0,
            name: candidate.name.clone(),
            session_id: None,
            password,
            created_at: now,
            updated_at: now,
        })
    }
}
