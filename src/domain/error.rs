//! Domain Error Types
//!
//! The typed error taxonomy shared by repositories, domain services and the
//! application services. Every error carries enough structure for the
//! presentation layer to pick a stable status without parsing messages.

use std::fmt;

/// Boxed cause carried by storage-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Repository method that was being attempted when a storage failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryMethod {
    Read,
    Insert,
    Update,
    Delete,
    List,
}

impl RepositoryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::List => "LIST",
        }
    }
}

impl fmt::Display for RepositoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted entity a domain error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityName {
    User,
    Session,
    Thread,
    Comment,
}

impl EntityName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Session => "session",
            Self::Thread => "thread",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction lifecycle step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TransactionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Begin => "begin",
            Self::Commit => "commit",
            Self::Rollback => "rollback",
        })
    }
}

/// A single rejected input field.
///
/// `value` is `None` for fields that must never be echoed back (passwords).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParam {
    pub field: String,
    pub value: Option<String>,
    pub reason: String,
}

impl InvalidParam {
    pub fn new(field: impl Into<String>, value: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvalidParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}, {}, is invalid, {}", self.field, value, self.reason),
            None => write!(f, "{} is invalid, {}", self.field, self.reason),
        }
    }
}

/// Aggregate of per-field validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvalidParams(pub Vec<InvalidParam>);

impl InvalidParams {
    pub fn iter(&self) -> impl Iterator<Item = &InvalidParam> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InvalidParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join(","))
    }
}

/// Coarse classification used by the transport to choose a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    AuthenticationFailed,
    InvalidParams,
    Repository,
    TransactionClose,
    Internal,
}

/// Domain error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{property}, {value}, {entity}, is already exists")]
    AlreadyExists {
        entity: EntityName,
        property: &'static str,
        value: String,
    },

    #[error("no such data, {property}: {value}, {entity}")]
    NotFound {
        entity: EntityName,
        property: &'static str,
        value: String,
    },

    /// Never says which factor was wrong.
    #[error("invalid name or password")]
    AuthenticationFailed,

    #[error("{0}")]
    InvalidParam(InvalidParam),

    #[error("{0}")]
    InvalidParams(InvalidParams),

    #[error("failed repository operation, {method}, {entity}")]
    Repository {
        method: RepositoryMethod,
        entity: EntityName,
        #[source]
        source: BoxError,
    },

    #[error("failed to {stage} transaction")]
    Transaction {
        stage: TransactionStage,
        #[source]
        source: BoxError,
    },

    #[error("could not allocate a unique session id after {attempts} attempts")]
    SessionIdExhausted { attempts: u32 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn already_exists(
        entity: EntityName,
        property: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::AlreadyExists {
            entity,
            property,
            value: value.to_string(),
        }
    }

    pub fn not_found(entity: EntityName, property: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            property,
            value: value.to_string(),
        }
    }

    pub fn repository(
        method: RepositoryMethod,
        entity: EntityName,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Repository {
            method,
            entity,
            source: source.into(),
        }
    }

    pub fn transaction(stage: TransactionStage, source: impl Into<BoxError>) -> Self {
        Self::Transaction {
            stage,
            source: source.into(),
        }
    }

    /// Build the validation error for a list of failures, collapsing a single
    /// failure into `InvalidParam`.
    pub fn invalid(mut params: Vec<InvalidParam>) -> Self {
        if params.len() == 1 {
            if let Some(param) = params.pop() {
                return Self::InvalidParam(param);
            }
        }
        Self::InvalidParams(InvalidParams(params))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            Self::InvalidParam(_) | Self::InvalidParams(_) => ErrorKind::InvalidParams,
            Self::Repository { .. } | Self::Transaction { .. } => ErrorKind::Repository,
            Self::SessionIdExhausted { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Per-field failures, if this is a validation error.
    pub fn invalid_params(&self) -> Vec<InvalidParam> {
        match self {
            Self::InvalidParam(param) => vec![param.clone()],
            Self::InvalidParams(params) => params.0.clone(),
            _ => Vec::new(),
        }
    }
}
