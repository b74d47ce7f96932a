//! Natural-key existence checks run inside the caller's transaction.
//!
//! A missing row is `false`. A `NotFound` error from storage is also treated
//! as `false`; every other error aborts the caller's operation.

use std::sync::Arc;

use crate::domain::entities::{
    CommentRepository, SessionRepository, ThreadRepository, UserRepository,
};
use crate::domain::error::DomainError;

fn exists<T>(lookup: Result<Option<T>, DomainError>) -> Result<bool, DomainError> {
    match lookup {
        Ok(found) => Ok(found.is_some()),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Existence checks for users.
pub struct UserDomainService<R> {
    repo: Arc<R>,
}

impl<R> UserDomainService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn exists_by_name<Tx: Send>(
        &self,
        tx: &mut Tx,
        name: &str,
    ) -> Result<bool, DomainError>
    where
        R: UserRepository<Tx>,
    {
        exists(self.repo.find_by_name(tx, name).await)
    }
}

/// Existence checks for sessions.
pub struct SessionDomainService<R> {
    repo: Arc<R>,
}

impl<R> SessionDomainService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn exists_by_id<Tx: Send>(&self, tx: &mut Tx, id: &str) -> Result<bool, DomainError>
    where
        R: SessionRepository<Tx>,
    {
        exists(self.repo.find_by_id(tx, id).await)
    }
}

/// Existence checks for threads.
pub struct ThreadDomainService<R> {
    repo: Arc<R>,
}

impl<R> ThreadDomainService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn exists_by_title<Tx: Send>(
        &self,
        tx: &mut Tx,
        title: &str,
    ) -> Result<bool, DomainError>
    where
        R: ThreadRepository<Tx>,
    {
        exists(self.repo.find_by_title(tx, title).await)
    }

    pub async fn exists_by_id<Tx: Send>(&self, tx: &mut Tx, id: i64) -> Result<bool, DomainError>
    where
        R: ThreadRepository<Tx>,
    {
        exists(self.repo.find_by_id(tx, id).await)
    }
}

/// Existence checks for comments.
pub struct CommentDomainService<R> {
    repo: Arc<R>,
}

impl<R> CommentDomainService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn exists_by_id<Tx: Send>(&self, tx: &mut Tx, id: i64) -> Result<bool, DomainError>
    where
        R: CommentRepository<Tx>,
    {
        exists(self.repo.find_by_id(tx, id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{EntityName, RepositoryMethod};

    #[test]
    fn test_found_row_exists() {
        assert!(exists(Ok(Some(1))).unwrap());
    }

    #[test]
    fn test_missing_row_does_not_exist() {
        assert!(!exists::<i32>(Ok(None)).unwrap());
    }

    #[test]
    fn test_not_found_error_does_not_exist() {
        let lookup: Result<Option<i32>, _> =
            Err(DomainError::not_found(EntityName::Thread, "id", 3));
        assert!(!exists(lookup).unwrap());
    }

    #[test]
    fn test_other_errors_propagate() {
        let lookup: Result<Option<i32>, _> = Err(DomainError::repository(
            RepositoryMethod::Read,
            EntityName::Thread,
            "connection reset",
        ));
        let err = exists(lookup).unwrap_err();
        assert!(matches!(err, DomainError::Repository { .. }));
    }
}
