use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    claims::TokenKind,
    dto::{AuthResponse, CredentialsRequest, PublicUser, RefreshRequest},
    extractors::Session,
    jwt::JwtKeys,
    password::{hash_password, is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }

    let taken = || AppError::Conflict("Email already registered".into());
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(taken());
    }

    let hash = hash_password(&payload.password).map_err(AppError::Internal)?;
    let user = state
        .users
        .create(&email, &hash)
        .await?
        .ok_or_else(taken)?;

    info!(user_id = %user.id, "user registered");
    issue_tokens(&state, user.id, user.email)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!("login for unknown email");
        return Err(AppError::Unauthenticated("Invalid credentials".into()));
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(AppError::Internal)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthenticated("Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(&state, user.id, user.email)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let claims = JwtKeys::from_ref(&state)
        .verify(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("User not found".into()))?;

    issue_tokens(&state, user.id, user.email)
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>, session: Session) -> AppResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

fn issue_tokens(state: &AppState, user_id: Uuid, email: String) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user_id).map_err(AppError::Internal)?;
    let refresh_token = keys.sign_refresh(user_id).map_err(AppError::Internal)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser { id: user_id, email },
    }))
}
