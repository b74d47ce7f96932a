//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints. Each one converts its DTO into a
//! domain candidate, calls one application service and maps the result.

pub mod auth;
pub mod comment;
pub mod health;
pub mod thread;
