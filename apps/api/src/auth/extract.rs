//! Axum extractors that resolve the `Authorization: Bearer <token>` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::auth::token::Claims;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// A request made by a signed-in user. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// `Some(user)` when a valid user token is present, `None` when the header is
/// absent. A present but bad token is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

/// A request carrying a valid admin-audience token.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(AppError::authentication_required)?;
        let user = state.auth.authenticate(token).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(OptionalUser(None));
        }
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized("Invalid token"))?;
        let user = state.auth.authenticate(token).await?;
        Ok(OptionalUser(Some(user)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(AppError::authentication_required)?;
        let claims = state.admin.verify(token)?;
        Ok(AdminSession(claims))
    }
}
