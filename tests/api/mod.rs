mod auth_tests;
mod comment_tests;
mod health_tests;
mod thread_tests;
