//! Infrastructure Layer
//!
//! Contains implementations of the domain ports:
//! - Database unit of work and repositories (PostgreSQL)
//! - In-memory storage with the same transactional semantics
//! - Argon2/UUID identity service

pub mod database;
pub mod identity;
pub mod memory;
pub mod repositories;

pub use identity::Argon2IdentityService;
pub use memory::MemoryStore;
