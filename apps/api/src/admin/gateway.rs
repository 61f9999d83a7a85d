use serde::Serialize;
use tracing::{info, warn};

use crate::auth::token::{Audience, Claims, TokenCodec};
use crate::auth::AuthError;

/// Subject carried by every admin session token.
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Serialize)]
pub struct AdminLogin {
    pub token: String,
    pub email: String,
}

/// Static single-account admin login.
///
/// Credentials come from configuration and are compared as plain strings.
/// When either is unset, every login attempt fails.
#[derive(Clone)]
pub struct AdminGateway {
    credentials: Option<(String, String)>,
    tokens: TokenCodec,
}

impl AdminGateway {
    pub fn new(email: Option<String>, password: Option<String>, tokens: TokenCodec) -> Self {
        let credentials = match (email, password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => {
                warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; admin login is disabled");
                None
            }
        };
        Self {
            credentials,
            tokens,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AdminLogin, AuthError> {
        let Some((expected_email, expected_password)) = &self.credentials else {
            return Err(AuthError::InvalidCredentials);
        };
        if email != expected_email.as_str() || password != expected_password.as_str() {
            warn!("Rejected admin login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(ADMIN_SUBJECT, email, Audience::Admin)?;
        info!("Admin signed in");
        Ok(AdminLogin {
            token,
            email: email.to_string(),
        })
    }

    /// Accepts only admin-audience tokens issued by [`AdminGateway::login`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.tokens.decode(token, Audience::Admin)?;
        if claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }
}
