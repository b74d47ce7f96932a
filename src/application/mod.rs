//! Application Layer
//!
//! Use-case services that own the transaction boundary, plus the JSON DTOs
//! the HTTP layer converts to and from.

pub mod dto;
pub mod services;
