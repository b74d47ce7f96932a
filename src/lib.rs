//! # Thread Chat Server Library
//!
//! A small chat backend: users sign up and log in with a session cookie,
//! create threads and post comments on them.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, validation rules, repository and unit of
//!   work ports
//! - **Application Layer**: Transactional use-case services and DTOs
//! - **Infrastructure Layer**: PostgreSQL and in-memory adapters, Argon2
//!   password hashing
//! - **Presentation Layer**: axum routes, handlers and extractors
//!
//! ## Module Structure
//!
//! ```text
//! thread_chat_server/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, ports, domain services
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Storage and identity adapters
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Error responses and validation helpers
//! ```

pub mod config;

pub mod domain;

pub mod application;

pub mod infrastructure;

pub mod presentation;

pub mod shared;

// Application startup and state management
pub mod startup;

pub mod telemetry;
