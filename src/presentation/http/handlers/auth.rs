//! Authentication Handlers
//!
//! Sign-up and login answer with the user and set the session cookie;
//! logout clears it.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::application::dto::{LoginRequest, SignUpRequest, UserResponse};
use crate::config::AuthSettings;
use crate::presentation::http::extractors::{CurrentUser, JsonBody, SessionId};
use crate::shared::error::AppError;
use crate::startup::AppState;

fn session_cookie(settings: &AuthSettings, session_id: String) -> Cookie<'static> {
    Cookie::build((settings.session_cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn with_session(jar: CookieJar, settings: &AuthSettings, session_id: Option<String>) -> CookieJar {
    match session_id {
        Some(id) => jar.add(session_cookie(settings, id)),
        None => jar,
    }
}

/// Register a new user and log them in
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AppError> {
    let user = state.auth.sign_up(body.into()).await?;
    let jar = with_session(jar, &state.settings.auth, user.session_id.clone());

    Ok((StatusCode::CREATED, jar, Json(user.into())))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    let user = state.auth.login(body.into()).await?;
    let jar = with_session(jar, &state.settings.auth, user.session_id.clone());

    Ok((jar, Json(user.into())))
}

/// End the current session. Succeeds without a cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    session: Option<SessionId>,
) -> Result<(StatusCode, CookieJar), AppError> {
    if let Some(SessionId(session_id)) = session {
        state.auth.logout(&session_id).await?;
    }

    let removal = Cookie::build(state.settings.auth.session_cookie_name.clone()).path("/");
    Ok((StatusCode::NO_CONTENT, jar.remove(removal)))
}

/// User owning the session cookie
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
