//! Data Transfer Objects
//!
//! DTOs for API request/response serialization.

pub mod request;
pub mod response;

pub use request::{CommentRequest, LoginRequest, SignUpRequest, ThreadRequest};
pub use response::{AuthorResponse, CommentResponse, PageResponse, ThreadResponse, UserResponse};
