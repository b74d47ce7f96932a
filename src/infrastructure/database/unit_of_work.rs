//! Unit of Work Implementation
//!
//! PostgreSQL transaction boundaries for the application services.
//! All repository calls of one use case go through the same
//! `TransactionContext`.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::debug;

use crate::domain::error::{DomainError, TransactionStage};
use crate::domain::unit_of_work::{StorageHealth, UnitOfWork};

/// Transaction context that wraps a SQLx transaction.
///
/// Dropping it without commit rolls the transaction back.
pub struct TransactionContext {
    tx: Transaction<'static, Postgres>,
}

impl TransactionContext {
    /// Create a new transaction context.
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    /// Connection to run queries on inside this transaction.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

/// PostgreSQL Unit of Work implementation.
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    /// Create a new Unit of Work instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Tx = TransactionContext;

    async fn begin(&self) -> Result<TransactionContext, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::transaction(TransactionStage::Begin, e))?;
        Ok(TransactionContext::new(tx))
    }

    async fn commit(&self, ctx: TransactionContext) -> Result<(), DomainError> {
        ctx.tx
            .commit()
            .await
            .map_err(|e| DomainError::transaction(TransactionStage::Commit, e))
    }

    async fn rollback(&self, ctx: TransactionContext) -> Result<(), DomainError> {
        debug!("rolling back database transaction");
        ctx.tx
            .rollback()
            .await
            .map_err(|e| DomainError::transaction(TransactionStage::Rollback, e))
    }
}

#[async_trait]
impl StorageHealth for PgUnitOfWork {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::Internal(format!("database ping failed: {e}")))
    }
}
