//! # Configuration
//!
//! Layered settings for the server, the PostgreSQL pool, sessions and CORS.
//! Later sources override earlier ones:
//!
//! 1. built-in defaults
//! 2. `config/default.toml`, then `config/{RUN_ENV}.toml`
//! 3. `APP__SECTION__KEY` environment variables (a `.env` file is read first)
//! 4. `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`
//!
//! ```rust,ignore
//! let settings = thread_chat_server::config::Settings::load()?;
//! assert!(settings.auth.max_session_id_attempts >= 1);
//! ```

mod settings;

pub use settings::*;
