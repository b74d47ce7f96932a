//! Custom Extractors
//!
//! Axum extractors for the session cookie and request parsing. Rejections
//! are reported as `AppError` so every failure shares one body shape.

use axum::{
    extract::{FromRequest, FromRequestParts, OptionalFromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;

use crate::domain::entities::User;
use crate::domain::error::ErrorKind;
use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// User owning the session named by the request's session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionId(session_id) = SessionId::from_cookie(parts, state)
            .ok_or_else(|| AppError::Unauthorized("Missing session".into()))?;

        match state.auth.current_user(&session_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::Unauthorized("Invalid session".into()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Raw session id from the cookie, if the client sent one.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl SessionId {
    fn from_cookie(parts: &Parts, state: &AppState) -> Option<Self> {
        let jar = CookieJar::from_headers(&parts.headers);
        jar.get(&state.settings.auth.session_cookie_name)
            .map(|c| c.value().trim())
            .filter(|v| !v.is_empty())
            .map(|v| SessionId(v.to_owned()))
    }
}

impl OptionalFromRequestParts<AppState> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(SessionId::from_cookie(parts, state))
    }
}

/// JSON body with rejections mapped to `AppError::BadRequest`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Path parameters with rejections mapped to `AppError::BadRequest`.
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = <Path<T> as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(IdPath(inner))
    }
}

/// `?limit=&cursor=` query. Range checks happen in the services.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery(pub PageRequest);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(page) =
            <Query<PageRequest> as FromRequestParts<S>>::from_request_parts(parts, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(PageQuery(page))
    }
}
