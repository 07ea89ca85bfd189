use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            CreateAccountRequest, CreateAccountResponse, LoginRequest, LoginResponse,
            LogoutResponse, ProfileResponse, UpdatePasswordRequest, UpdatePasswordResponse,
        },
        password::{hash_password, validate_new_password, verify_password},
        repo::{is_unique_violation, User},
        session::{clear_session_cookie, session_cookie, SessionKeys, SessionUser},
    },
    error::ApiError,
    state::AppState,
};

fn establish_session(state: &AppState, user: &User) -> Result<HeaderMap, ApiError> {
    let keys = SessionKeys::from_ref(state);
    let token = keys.sign(user.id, &user.email)?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&token)?);
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    payload: Option<Json<CreateAccountRequest>>,
) -> Result<(HeaderMap, Json<CreateAccountResponse>), ApiError> {
    // A missing or malformed body counts as an empty one.
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(ApiError::validation("missing_name"));
    }
    if email.is_empty() {
        return Err(ApiError::validation("missing_email"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("missing_password"));
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(
        &state.db,
        &name,
        &email,
        &hash,
        &payload.location,
        &payload.phone,
    )
    .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "email already registered");
            return Err(ApiError::EmailExists);
        }
        Err(e) => return Err(e.into()),
    };

    let headers = establish_session(&state, &user)?;
    info!(user_id = user.id, email = %user.email, "account created");
    Ok((
        headers,
        Json(CreateAccountResponse {
            created: true,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("missing_fields"));
    }

    // Unknown email and wrong password collapse to the same answer.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(user) => user,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let headers = establish_session(&state, &user)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(LoginResponse {
            logged_in: true,
            user: user.into(),
        }),
    ))
}

#[instrument]
pub async fn logout() -> (HeaderMap, Json<LogoutResponse>) {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, clear_session_cookie());
    (headers, Json(LogoutResponse { logged_out: true }))
}

#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn profile(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(ProfileResponse { user: user.into() }))
}

#[instrument(skip(state, session, payload), fields(user_id = session.user_id))]
pub async fn update_password(
    State(state): State<AppState>,
    session: SessionUser,
    payload: Option<Json<UpdatePasswordRequest>>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    validate_new_password(&payload.new_password)?;

    let user = User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = user.id, "password updated");
    Ok(Json(UpdatePasswordResponse {
        updated: true,
        message: "Password updated successfully",
    }))
}
