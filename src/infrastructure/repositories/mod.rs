//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! Every repository runs its writes and in-transaction reads on the
//! caller's `TransactionContext`, and its read-only listings on the pool.
//! Driver failures are mapped to `DomainError::Repository` with the method
//! and entity that was attempted.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - User accounts and session back-references
//! - **PgSessionRepository** - Login sessions
//! - **PgThreadRepository** - Threads with keyset pagination
//! - **PgCommentRepository** - Comments joined with their author

pub mod comment_repository;
pub mod session_repository;
pub mod thread_repository;
pub mod user_repository;

pub use comment_repository::PgCommentRepository;
pub use session_repository::PgSessionRepository;
pub use thread_repository::PgThreadRepository;
pub use user_repository::PgUserRepository;

use sqlx::postgres::PgQueryResult;

use crate::domain::error::{DomainError, EntityName, RepositoryMethod};

/// Wrap a driver error with the attempted method and entity.
pub(crate) fn db_error(
    method: RepositoryMethod,
    entity: EntityName,
) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::repository(method, entity, e)
}

/// Like [`db_error`], but a unique-key violation becomes `on_unique()`.
/// Concurrent writers can both pass the existence check before the insert.
pub(crate) fn map_unique_violation<F>(
    method: RepositoryMethod,
    entity: EntityName,
    on_unique: F,
) -> impl FnOnce(sqlx::Error) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    move |e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return on_unique();
            }
        }
        DomainError::repository(method, entity, e)
    }
}

/// Like [`db_error`], but a foreign-key violation is handed to
/// `on_missing` with the violated constraint's name.
pub(crate) fn map_foreign_key_violation<F>(
    method: RepositoryMethod,
    entity: EntityName,
    on_missing: F,
) -> impl FnOnce(sqlx::Error) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    move |e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_foreign_key_violation() {
                return on_missing(db_err.constraint());
            }
        }
        DomainError::repository(method, entity, e)
    }
}

/// Fail unless the statement touched exactly one row.
pub(crate) fn expect_one_row(
    result: PgQueryResult,
    method: RepositoryMethod,
    entity: EntityName,
) -> Result<(), DomainError> {
    match result.rows_affected() {
        1 => Ok(()),
        n => Err(DomainError::repository(
            method,
            entity,
            format!("expected 1 affected row, got {n}"),
        )),
    }
}
