//! Application Services
//!
//! Use-case orchestrators that coordinate domain checks, repositories and
//! transaction boundaries.
//!
//! ## Available Services
//!
//! - **AuthenticationService**: Sign-up, login, logout, session resolution
//! - **ThreadService**: Thread listing and CRUD
//! - **CommentService**: Comment listing and CRUD

pub mod auth_service;
pub mod comment_service;
pub mod error;
pub mod thread_service;
pub mod transaction;

pub use auth_service::{
    AuthenticationService, AuthenticationServiceImpl, DEFAULT_MAX_SESSION_ID_ATTEMPTS,
};
pub use comment_service::{CommentService, CommentServiceImpl};
pub use error::{Operation, ServiceError};
pub use thread_service::{ThreadService, ThreadServiceImpl};
