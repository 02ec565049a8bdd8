use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use super::session::{SessionManager, SESSION_COOKIE};
use crate::error::ApiError;

/// Extracts the live session behind the request's session cookie.
///
/// Rejects with the standard 401 `Unauthorized` body when the cookie is
/// missing or its token does not resolve to a session. Handlers that need
/// to end the session get the token alongside the user id.
pub struct AuthSession {
    pub user_id: Uuid,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionManager: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let sessions = SessionManager::from_ref(state);
        let user_id = sessions.get(&token).ok_or(ApiError::Unauthorized)?;

        Ok(AuthSession { user_id, token })
    }
}
