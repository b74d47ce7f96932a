//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **PageRequest**: validated limit/cursor pair for keyset pagination
//! - **Page**: one page of results with the next cursor

mod pagination;

pub use pagination::*;
