//! JWT issuing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Which half of the token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub role: String,
    pub typ: TokenKind,
    /// Unique per token so two tokens issued in the same second differ
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// A signed token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 tokens
#[derive(Clone)]
pub struct TokenProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret_bytes()),
            access_ttl_seconds: config.access_token_ttl_seconds,
            refresh_ttl_seconds: config.refresh_token_ttl_seconds,
        }
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    pub fn issue(&self, user: &User, kind: TokenKind) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        };
        let expires_at = now + Duration::seconds(ttl);

        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            typ: kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, and that the token is of `kind`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?
            .claims;
        if claims.typ != kind {
            return Err(AppError::unauthorized("Invalid token type"));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::sample_user;
    use crate::domain::UserRole;

    fn provider() -> TokenProvider {
        TokenProvider::new(&Config::with_secret("test-secret-key-for-testing-only-32chars").unwrap())
    }

    #[test]
    fn test_issue_and_verify() {
        let provider = provider();
        let user = sample_user(42, UserRole::Worker);
        let issued = provider.issue(&user, TokenKind::Access).unwrap();

        let claims = provider.verify(&issued.token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "WORKER");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let provider = provider();
        let user = sample_user(1, UserRole::User);
        let refresh = provider.issue(&user, TokenKind::Refresh).unwrap();

        assert!(matches!(
            provider.verify(&refresh.token, TokenKind::Access),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_tokens_are_unique() {
        let provider = provider();
        let user = sample_user(1, UserRole::User);
        let a = provider.issue(&user, TokenKind::Refresh).unwrap();
        let b = provider.issue(&user, TokenKind::Refresh).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let user = sample_user(1, UserRole::User);
        let other = TokenProvider::new(
            &Config::with_secret("another-secret-key-that-is-long-enough").unwrap(),
        );
        let token = other.issue(&user, TokenKind::Access).unwrap().token;
        assert!(matches!(
            provider().verify(&token, TokenKind::Access),
            Err(AppError::Jwt(_))
        ));
    }
}
