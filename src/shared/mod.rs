//! Cross-layer helpers: HTTP error bodies and input validation.

pub mod error;
pub mod validation;
