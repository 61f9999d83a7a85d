//! Session token codec.
//!
//! Tokens are HS256-signed JWTs carrying `{sub, email, aud, iat, exp}`.
//! The audience separates user sessions from admin sessions: a token only
//! decodes on the path whose audience it was issued for.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed validity window: 7 days from issuance. No refresh.
pub const TOKEN_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    User,
    Admin,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Audience::User => "user",
            Audience::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, or `"admin"` for admin sessions.
    pub sub: String,
    pub email: String,
    pub aud: Audience,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature and structure are valid but `now >= exp`.
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token, or wrong audience.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, sub: &str, email: &str, aud: Audience) -> Result<String, TokenError> {
        self.issue_at(sub, email, aud, Utc::now())
    }

    pub fn issue_at(
        &self,
        sub: &str,
        email: &str,
        aud: Audience,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            aud,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn decode(&self, token: &str, aud: Audience) -> Result<Claims, TokenError> {
        self.decode_at(token, aud, Utc::now())
    }

    /// Verifies signature, structure and audience, then checks expiry
    /// against `now`.
    pub fn decode_at(
        &self,
        token: &str,
        aud: Audience,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked below against the supplied clock
        validation.validate_exp = false;
        validation.set_audience(&[aud.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters-long";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let token = codec().issue("user-1", "a@example.com", Audience::User).unwrap();
        let claims = codec().decode(&token, Audience::User).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_claim_is_expired_not_invalid() {
        let now = Utc::now();
        let claims = Claims {
            sub: "user-1".into(),
            email: "a@example.com".into(),
            aud: Audience::User,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = codec().sign(&claims).unwrap();
        assert_eq!(
            codec().decode(&token, Audience::User),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_expires_exactly_at_ttl() {
        let issued = Utc::now();
        let token = codec()
            .issue_at("user-1", "a@example.com", Audience::User, issued)
            .unwrap();
        let just_before = issued + Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(1);
        let at_expiry = issued + Duration::hours(TOKEN_TTL_HOURS);
        assert!(codec()
            .decode_at(&token, Audience::User, just_before)
            .is_ok());
        assert_eq!(
            codec().decode_at(&token, Audience::User, at_expiry),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let token = codec().issue("user-1", "a@example.com", Audience::User).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{head}.{flipped}{}", &sig[1..]);
        assert_eq!(
            codec().decode(&tampered, Audience::User),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_expired_and_tampered_is_invalid() {
        let now = Utc::now();
        let token = codec()
            .issue_at("user-1", "a@example.com", Audience::User, now - Duration::days(30))
            .unwrap();
        let other = TokenCodec::new("a-completely-different-secret-value-1234");
        assert_eq!(
            other.decode(&token, Audience::User),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_audiences_do_not_cross() {
        let admin = codec().issue("admin", "admin@example.com", Audience::Admin).unwrap();
        assert_eq!(
            codec().decode(&admin, Audience::User),
            Err(TokenError::Invalid)
        );

        let user = codec().issue("admin", "x@example.com", Audience::User).unwrap();
        assert_eq!(
            codec().decode(&user, Audience::Admin),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            codec().decode("not.a.jwt", Audience::User),
            Err(TokenError::Invalid)
        );
        assert_eq!(codec().decode("", Audience::User), Err(TokenError::Invalid));
    }
}
