use axum::{extract::State, Json};

use crate::auth::service::{AuthResponse, LoginRequest, RegisterRequest};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.register(body).await?))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.login(body).await?))
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// POST /api/auth/google
pub async fn handle_google() -> Result<(), AppError> {
    Err(AppError::NotImplemented("Google sign-in is not available"))
}
