//! services/api/src/web/tokens.rs
//!
//! JWT access and refresh tokens. Both carry the same claims; they are told
//! apart by the secret they are signed with.

use blog_core::Role;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// The caller a verified token speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True for the owner of a resource and for admins.
    pub fn can_manage(&self, owner: Uuid) -> bool {
        self.id == owner || self.is_admin()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token could not be signed: {0}")]
    Sign(String),
    #[error("Token is invalid or expired")]
    Invalid,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl KeyPair {
    fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    fn issue(&self, user: AuthUser, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            exp: iat + self.ttl_secs,
            iat,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Sign(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)?;
        Ok(AuthUser {
            id,
            role: data.claims.role,
        })
    }
}

/// Issues and verifies the two kinds of session token.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            access: KeyPair::new(&config.jwt_secret, config.access_token_ttl_secs),
            refresh: KeyPair::new(&config.jwt_refresh_secret, config.refresh_token_ttl_secs),
        }
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh.ttl_secs
    }

    pub fn issue_access(&self, user: AuthUser, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.access.issue(user, now)
    }

    pub fn issue_refresh(&self, user: AuthUser, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.refresh.issue(user, now)
    }

    pub fn verify_access(&self, token: &str) -> Result<AuthUser, TokenError> {
        self.access.verify(token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<AuthUser, TokenError> {
        self.refresh.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(&Config::for_tests())
    }

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    #[test]
    fn access_token_round_trips_the_caller() {
        let tokens = service();
        let caller = user();
        let token = tokens.issue_access(caller, Utc::now()).unwrap();
        assert_eq!(tokens.verify_access(&token).unwrap(), caller);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let tokens = service();
        let token = tokens.issue_refresh(user(), Utc::now()).unwrap();
        assert!(tokens.verify_access(&token).is_err());
        assert!(tokens.verify_refresh(&token).is_ok());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let tokens = service();
        let token = tokens
            .issue_access(user(), Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(matches!(
            tokens.verify_access(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn only_owners_and_admins_manage() {
        let owner = Uuid::new_v4();
        let reader = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(!reader.can_manage(owner));
        assert!(AuthUser { id: owner, role: Role::User }.can_manage(owner));
        assert!(user().can_manage(owner));
    }
}
