//! Argon2/UUID implementation of the identity port.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::services::IdentityService;

/// Session ids are UUID v4 strings; passwords are Argon2id PHC strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2IdentityService;

impl Argon2IdentityService {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityService for Argon2IdentityService {
    fn new_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::Internal(format!("invalid password hash: {e}")))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let identity = Argon2IdentityService::new();
        let hash = identity.hash_password("password1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(identity.verify_password("password1", &hash).unwrap());
        assert!(!identity.verify_password("password2", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let identity = Argon2IdentityService::new();
        assert!(identity.verify_password("password1", "not-a-hash").is_err());
    }

    #[test]
    fn test_session_ids_are_distinct_uuids() {
        let identity = Argon2IdentityService::new();
        let a = identity.new_session_id();
        let b = identity.new_session_id();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
