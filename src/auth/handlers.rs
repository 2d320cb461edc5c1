use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
        services::{gravatar_url, is_valid_email},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth", post(login).get(current_user))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

/// POST /users: create an account and return a token for it.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if !is_valid_email(&payload.email) {
        errors.push("Enter a valid email".to_string());
    }
    if payload.password.len() < 6 {
        errors.push("Please enter a password with 6 or more characters".to_string());
    }
    if !errors.is_empty() {
        warn!(count = errors.len(), "registration rejected");
        return Err(ApiError::validation(errors));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::BadRequest("User already exists"));
    }

    let avatar = gravatar_url(&payload.email);
    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash, &avatar).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user registered");
    Ok(Json(TokenResponse { token }))
}

/// POST /auth: exchange credentials for a token. Unknown email and wrong
/// password answer with the same message.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.email) {
        errors.push("Invalid Credentials".to_string());
    }
    if payload.password.is_empty() {
        errors.push("Invalid Credentials".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!("login with unknown email");
            return Err(ApiError::BadRequest("Invalid Credentials"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::BadRequest("Invalid Credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

/// GET /auth: the user behind the presented token, minus the password hash.
#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;
    Ok(Json(user))
}
