//! CORS Middleware Configuration

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Create CORS layer from settings.
///
/// With no parseable origin configured any origin is allowed, without
/// credentials. Listed origins may send the session cookie.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_origins_fall_back_to_any() {
        let settings = CorsSettings {
            allowed_origins: vec!["not a header\n".into()],
        };
        // Building must not panic for either branch.
        let _ = create_cors_layer(&settings);
        let _ = create_cors_layer(&CorsSettings {
            allowed_origins: vec!["http://localhost:3000".into()],
        });
    }
}
