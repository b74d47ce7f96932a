//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to
//! a single entity.
//!
//! - **uniqueness**: per-entity natural-key existence checks
//! - **UserFactory**: validated construction of new users
//! - **IdentityService**: session id and password hashing port
//! - **Clock**: injected time source

mod clock;
mod identity;
mod uniqueness;
mod user_factory;

pub use clock::{Clock, FixedClock, SystemClock};
#[cfg(test)]
pub use identity::MockIdentityService;
pub use identity::IdentityService;
pub use uniqueness::{
    CommentDomainService, SessionDomainService, ThreadDomainService, UserDomainService,
};
pub use user_factory::UserFactory;
