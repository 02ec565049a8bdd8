use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UserBody},
        extractors::AuthSession,
        password,
        session::SESSION_COOKIE,
    },
    error::ApiError,
    state::AppState,
    store::NewUser,
    validate,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/check_session", get(check_session))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserBody>), ApiError> {
    let username = validate::username(payload.username.as_deref())?;
    let password = validate::password(payload.password.as_deref())?;

    let password_hash = password::hash_password(&password)?;
    let user = state
        .store
        .create_user(NewUser {
            username,
            password_hash,
            image_url: payload.image_url,
            bio: payload.bio,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user signed up");
    let jar = open_session(&state, jar, user.id);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserBody::new(user, Vec::new())),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserBody>), ApiError> {
    let username = payload.username.as_deref().unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    let user = match state.store.find_user_by_username(username).await? {
        Some(user) if password::verify_password(password, &user.password_hash) => user,
        Some(user) => {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(ApiError::InvalidCredentials);
        }
        None => {
            // Spend the same argon2 work as the wrong-password path.
            password::burn_verification(password);
            warn!(username = %username, "login failed: unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let recipes = state.store.recipes_for_user(user.id).await?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    let jar = open_session(&state, jar, user.id);
    Ok((jar, Json(UserBody::new(user, recipes))))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    session: AuthSession,
) -> (StatusCode, CookieJar) {
    state.sessions.clear(&session.token);
    info!(user_id = %session.user_id, "user logged out");

    let mut expired = Cookie::from(SESSION_COOKIE);
    expired.set_path("/");
    (StatusCode::NO_CONTENT, jar.remove(expired))
}

#[instrument(skip_all)]
pub async fn check_session(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<UserBody>, ApiError> {
    let Some(user) = state.store.get_user(session.user_id).await? else {
        // The token outlived its user row; treat it like no session at all.
        warn!(user_id = %session.user_id, "session references a missing user");
        return Err(ApiError::Unauthorized);
    };

    let recipes = state.store.recipes_for_user(user.id).await?;
    Ok(Json(UserBody::new(user, recipes)))
}

/// Mint a session for `user_id` and attach its cookie to the jar.
fn open_session(state: &AppState, jar: CookieJar, user_id: Uuid) -> CookieJar {
    let token = state.sessions.create();
    state.sessions.set(&token, user_id);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
