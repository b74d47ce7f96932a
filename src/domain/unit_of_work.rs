//! Unit of Work Port
//!
//! Transaction boundary contract implemented by the storage adapters.
//! Repositories receive the adapter's transaction handle (`Tx`) so that every
//! read and write of one use case goes through the same transaction.

use async_trait::async_trait;

use super::error::DomainError;

/// Unit of Work trait for managing storage transactions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Transaction handle owned by the caller between `begin` and
    /// `commit`/`rollback`. Dropping it without closing rolls back.
    type Tx: Send + 'static;

    /// Begin a new transaction.
    async fn begin(&self) -> Result<Self::Tx, DomainError>;

    /// Commit the transaction.
    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;

    /// Rollback the transaction.
    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError>;
}

/// Liveness probe for the backing store, used by readiness checks.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;
}
