use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::token::{Audience, TokenCodec};
use crate::auth::AuthError;
use crate::models::user::{User, UserRecord};
use crate::store::{StoreError, UserStore};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Registers users, verifies credentials and resolves session tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = req.email.trim().to_string();
        let name = req.name.trim().to_string();
        validate_email(&email)?;
        if req.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }
        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password_blocking(req.password).await?;
        let record = UserRecord::new(email, name, password_hash);

        // A concurrent registration can pass the pre-check; the unique
        // constraint decides the winner.
        self.users.insert(&record).await.map_err(|e| match e {
            StoreError::Duplicate(_) => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        })?;

        info!(user_id = %record.user.id, "Registered new user");
        self.session_for(record.user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let Some(record) = self.users.find_by_email(req.email.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password_blocking(req.password, record.password_hash).await? {
            warn!(user_id = %record.user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        self.session_for(record.user)
    }

    /// Resolves a user-audience bearer token to the current user record.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.decode(token, Audience::User)?;
        self.users
            .find_by_id(&claims.sub)
            .await?
            .map(|record| record.user)
            .ok_or(AuthError::UserNotFound)
    }

    fn session_for(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = self.tokens.issue(&user.id, &user.email, Audience::User)?;
        Ok(AuthResponse { token, user })
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let invalid = || AuthError::Validation("A valid email address is required".to_string());
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
