//! Transaction boundary helpers shared by the application services.
//!
//! Every mutating use case runs as
//!
//! ```text
//! let mut tx = begin(uow, op).await?;
//! let result = self.op_in(&mut tx, ...).await;
//! close_transaction(uow, tx, op, result).await
//! ```
//!
//! so the close step sees every exit path of the body. If the future is
//! dropped before `close_transaction` runs, dropping `tx` rolls back.

use tracing::{debug, error};

use super::error::{Operation, ServiceError};
use crate::domain::error::DomainError;
use crate::domain::unit_of_work::UnitOfWork;

/// Open the transaction of `operation`.
pub async fn begin<U>(uow: &U, operation: Operation) -> Result<U::Tx, ServiceError>
where
    U: UnitOfWork + ?Sized,
{
    uow.begin().await.map_err(|e| operation.fail(e))
}

/// Commit on `Ok`, roll back on `Err`.
pub async fn close_transaction<U, T>(
    uow: &U,
    tx: U::Tx,
    operation: Operation,
    result: Result<T, DomainError>,
) -> Result<T, ServiceError>
where
    U: UnitOfWork + ?Sized,
{
    match result {
        Ok(value) => match uow.commit(tx).await {
            Ok(()) => Ok(value),
            Err(close) => {
                error!(%operation, error = %close, "failed to commit transaction");
                Err(ServiceError::TransactionClose {
                    operation,
                    close,
                    outcome: None,
                })
            }
        },
        Err(outcome) => {
            debug!(%operation, error = %outcome, "rolling back transaction");
            match uow.rollback(tx).await {
                Ok(()) => Err(operation.fail(outcome)),
                Err(close) => {
                    error!(%operation, error = %close, "failed to roll back transaction");
                    Err(ServiceError::TransactionClose {
                        operation,
                        close,
                        outcome: Some(outcome),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{EntityName, ErrorKind};
    use crate::infrastructure::memory::MemoryStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_ok_result_commits_once() {
        let store = MemoryStore::new();
        let tx = begin(&store, Operation::CreateThread).await.unwrap();

        let value = close_transaction(&store, tx, Operation::CreateThread, Ok(7))
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(store.commits(), 1);
        assert_eq!(store.rollbacks(), 0);
    }

    #[tokio::test]
    async fn test_err_result_rolls_back() {
        let store = MemoryStore::new();
        let tx = begin(&store, Operation::DeleteThread).await.unwrap();

        let err = close_transaction::<_, ()>(
            &store,
            tx,
            Operation::DeleteThread,
            Err(DomainError::not_found(EntityName::Thread, "id", 1)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.commits(), 0);
        assert_eq!(store.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_is_reported_as_close_error() {
        let store = MemoryStore::new();
        store.fail_commit();
        let tx = begin(&store, Operation::CreateComment).await.unwrap();

        let err = close_transaction(&store, tx, Operation::CreateComment, Ok(()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::TransactionClose { outcome: None, .. }
        ));
        assert_eq!(store.commits(), 0);
    }

    #[tokio::test]
    async fn test_rollback_failure_keeps_outcome() {
        let store = MemoryStore::new();
        store.fail_rollback();
        let tx = begin(&store, Operation::DeleteThread).await.unwrap();

        let err = close_transaction::<_, ()>(
            &store,
            tx,
            Operation::DeleteThread,
            Err(DomainError::not_found(EntityName::Thread, "id", 1)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransactionClose);
        assert!(matches!(
            err,
            ServiceError::TransactionClose {
                operation: Operation::DeleteThread,
                outcome: Some(ref outcome),
                ..
            } if outcome.is_not_found()
        ));
        assert_eq!(err.domain().map(DomainError::kind), Some(ErrorKind::NotFound));
        assert_eq!(store.commits(), 0);
    }

    #[tokio::test]
    async fn test_begin_failure_is_operation_error() {
        let store = MemoryStore::new();
        store.fail_begin();

        let err = begin(&store, Operation::CreateThread).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Operation {
                operation: Operation::CreateThread,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Repository);
        assert_eq!(store.commits() + store.rollbacks(), 0);
    }
}
