//! Authentication handler implementations

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::AppJson,
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
    utils::validation::validate_username,
};

use super::{
    request::{LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse},
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    validate_username(&payload.username).map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = AuthService::register(
        state.db(),
        &state.config().jwt,
        &payload.username,
        &payload.email,
        &payload.password,
        payload.full_name.as_deref(),
    )
    .await?;

    let response = AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, token) = AuthService::login(
        state.db(),
        &state.config().jwt,
        &payload.username,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = AuthService::get_user_by_id(state.db(), &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
