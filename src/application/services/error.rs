//! Service layer error types
//!
//! Wraps domain errors with the use case that produced them. A failure to
//! close the transaction is reported separately so callers can tell a
//! possibly-committed write from a clean failure.

use std::fmt;

use crate::domain::error::{DomainError, ErrorKind, InvalidParam};

/// Use cases exposed by the application services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignUp,
    Login,
    Logout,
    CurrentUser,
    ListThreads,
    GetThread,
    CreateThread,
    UpdateThread,
    DeleteThread,
    ListComments,
    GetComment,
    CreateComment,
    UpdateComment,
    DeleteComment,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignUp => "sign_up",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::CurrentUser => "current_user",
            Self::ListThreads => "list_threads",
            Self::GetThread => "get_thread",
            Self::CreateThread => "create_thread",
            Self::UpdateThread => "update_thread",
            Self::DeleteThread => "delete_thread",
            Self::ListComments => "list_comments",
            Self::GetComment => "get_comment",
            Self::CreateComment => "create_comment",
            Self::UpdateComment => "update_comment",
            Self::DeleteComment => "delete_comment",
        }
    }

    /// Attach this operation to a domain error.
    pub fn fail(self, source: DomainError) -> ServiceError {
        ServiceError::Operation {
            operation: self,
            source,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application service errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The use case itself failed; the transaction, if any, was rolled back.
    #[error("failed to {operation}: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: DomainError,
    },

    /// Commit or rollback failed. `outcome` is the use case's own error, or
    /// `None` if the use case had succeeded and the commit failed.
    #[error("failed to close transaction of {operation}: {close}")]
    TransactionClose {
        operation: Operation,
        #[source]
        close: DomainError,
        outcome: Option<DomainError>,
    },
}

impl ServiceError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Operation { operation, .. } | Self::TransactionClose { operation, .. } => {
                *operation
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Operation { source, .. } => source.kind(),
            Self::TransactionClose { .. } => ErrorKind::TransactionClose,
        }
    }

    /// The domain error of the use case, if it got that far.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Operation { source, .. } => Some(source),
            Self::TransactionClose { outcome, .. } => outcome.as_ref(),
        }
    }

    pub fn invalid_params(&self) -> Vec<InvalidParam> {
        match self {
            Self::Operation { source, .. } => source.invalid_params(),
            Self::TransactionClose { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{EntityName, TransactionStage};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operation_error_keeps_domain_kind() {
        let err = Operation::CreateThread.fail(DomainError::already_exists(
            EntityName::Thread,
            "title",
            "rust",
        ));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(err.operation(), Operation::CreateThread);
        assert_eq!(
            err.to_string(),
            "failed to create_thread: title, rust, thread, is already exists"
        );
    }

    #[test]
    fn test_close_failure_is_distinct() {
        let err = ServiceError::TransactionClose {
            operation: Operation::DeleteComment,
            close: DomainError::transaction(TransactionStage::Commit, "connection lost"),
            outcome: None,
        };
        assert_eq!(err.kind(), ErrorKind::TransactionClose);
        assert!(err.domain().is_none());
    }

    #[test]
    fn test_close_failure_retains_outcome() {
        let err = ServiceError::TransactionClose {
            operation: Operation::UpdateThread,
            close: DomainError::transaction(TransactionStage::Rollback, "connection lost"),
            outcome: Some(DomainError::not_found(EntityName::Thread, "id", 9)),
        };
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }
}
