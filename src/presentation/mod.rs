//! Presentation Layer
//!
//! HTTP routes, handlers and the tower middleware wrapped around them.

pub mod http;
pub mod middleware;
