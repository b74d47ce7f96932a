//! # Domain Layer
//!
//! The domain layer contains the core business rules of the chat backend.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Session, Thread, Comment)
//! - **value_objects**: Immutable value types (pagination)
//! - **services**: Uniqueness checks, identity and clock ports, user factory
//! - **unit_of_work**: Transaction boundary port
//! - **error**: Typed error taxonomy

pub mod entities;
pub mod error;
pub mod services;
pub mod unit_of_work;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use error::{DomainError, EntityName, ErrorKind, InvalidParam, RepositoryMethod};
pub use unit_of_work::{StorageHealth, UnitOfWork};
pub use value_objects::*;
