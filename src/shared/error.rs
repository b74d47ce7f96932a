//! Application Error Types
//!
//! Centralized error handling with Axum integration. Service errors are
//! mapped by kind to a stable status and code; internal causes are logged
//! and never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::services::ServiceError;
use crate::domain::error::ErrorKind;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// Status and numeric code returned for this error.
    pub fn status(&self) -> (StatusCode, u16) {
        match self {
            AppError::Service(err) => match err.kind() {
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, 10001),
                ErrorKind::InvalidParams => (StatusCode::BAD_REQUEST, 10007),
                ErrorKind::AuthenticationFailed => (StatusCode::UNAUTHORIZED, 10003),
                ErrorKind::AlreadyExists => (StatusCode::CONFLICT, 10005),
                ErrorKind::Repository | ErrorKind::TransactionClose | ErrorKind::Internal => {
                    (StatusCode::INTERNAL_SERVER_ERROR, 10000)
                }
            },
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, 10002),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, 10003),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, 10001),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let (message, errors) = match &self {
            AppError::Service(err) if status.is_server_error() => {
                tracing::error!(operation = %err.operation(), error = ?err, "request failed");
                (INTERNAL_MESSAGE.to_string(), None)
            }
            AppError::Service(err) if err.kind() == ErrorKind::InvalidParams => {
                let fields = err
                    .invalid_params()
                    .into_iter()
                    .map(|p| FieldError {
                        field: p.field,
                        value: p.value,
                        message: p.reason,
                    })
                    .collect();
                ("Invalid parameters".to_string(), Some(fields))
            }
            AppError::Service(err) => {
                let message = err
                    .domain()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| INTERNAL_MESSAGE.to_string());
                (message, None)
            }
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                (msg.clone(), None)
            }
        };

        let body = ErrorResponse {
            code,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::Operation;
    use crate::domain::error::{
        DomainError, EntityName, InvalidParam, RepositoryMethod, TransactionStage,
    };
    use test_case::test_case;

    fn service(err: DomainError) -> AppError {
        AppError::Service(Operation::CreateThread.fail(err))
    }

    #[test_case(service(DomainError::already_exists(EntityName::Thread, "title", "t")), StatusCode::CONFLICT ; "already exists")]
    #[test_case(service(DomainError::not_found(EntityName::Thread, "id", 1)), StatusCode::NOT_FOUND ; "not found")]
    #[test_case(service(DomainError::AuthenticationFailed), StatusCode::UNAUTHORIZED ; "authentication failed")]
    #[test_case(service(DomainError::invalid(vec![InvalidParam::new("title", None, "required")])), StatusCode::BAD_REQUEST ; "invalid param")]
    #[test_case(service(DomainError::repository(RepositoryMethod::Insert, EntityName::Thread, "boom")), StatusCode::INTERNAL_SERVER_ERROR ; "repository")]
    #[test_case(service(DomainError::SessionIdExhausted { attempts: 5 }), StatusCode::INTERNAL_SERVER_ERROR ; "session ids exhausted")]
    #[test_case(AppError::Unauthorized("missing session".into()), StatusCode::UNAUTHORIZED ; "missing session")]
    fn test_status_mapping(err: AppError, expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }

    #[test]
    fn test_transaction_close_is_internal() {
        let err = AppError::Service(ServiceError::TransactionClose {
            operation: Operation::DeleteThread,
            close: DomainError::transaction(TransactionStage::Commit, "connection reset"),
            outcome: None,
        });
        assert_eq!(err.status().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
