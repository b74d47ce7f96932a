//! # Domain Entities
//!
//! Core domain entities of the chat backend. All entities map directly to
//! their corresponding database tables.
//!
//! - **User**: account with hashed password and current session back-reference
//! - **Session**: login session owned by one user
//! - **Thread**: discussion thread with a unique title
//! - **Comment**: message posted on a thread by a user
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations, generic over the transaction handle of the storage adapter.
//! These traits are implemented in the infrastructure layer.

mod comment;
mod session;
mod thread;
mod user;

pub use comment::{
    Author, Comment, CommentCandidate, CommentList, CommentPatch, CommentRepository,
};
pub use session::{Session, SessionRepository};
pub use thread::{Thread, ThreadCandidate, ThreadList, ThreadRepository};
pub use user::{Credentials, User, UserCandidate, UserRepository};
