//! User authentication: password hashing, session tokens, and the request
//! extractors that resolve a bearer token to a user.

pub mod extract;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;
use token::TokenError;

pub use extract::{AdminSession, CurrentUser, OptionalUser};
pub use service::AuthService;
pub use token::TokenCodec;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email already registered")]
    DuplicateEmail,

    /// Shared by unknown email and wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    TokenInvalid,

    /// Token verified but its subject no longer resolves to a user.
    #[error("user not found")]
    UserNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
            TokenError::Signing(msg) => AuthError::Crypto(msg),
        }
    }
}
