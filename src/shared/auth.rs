//! Bearer token verification.
//!
//! Tokens are issued by the platform's account service and signed with a
//! shared HS256 secret. This service only verifies them; it never issues
//! tokens for end users.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::errors::{AppError, AppResult};
use crate::state::AppState;

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: i64, // Expiration time
    #[serde(default)]
    pub iat: i64, // Issued at
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// Verified identity of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
}

pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> AppResult<Actor> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError::Unauthorized("Token subject is not a valid user ID".to_string())
        })?;

        Ok(Actor {
            user_id,
            email: claims.email,
        })
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value
    pub fn bearer_token(header_value: &str) -> AppResult<&str> {
        header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Authorization header must use Bearer scheme".to_string())
            })
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

        let token = JwtVerifier::bearer_token(header)?;
        state.jwt.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn token_for(claims: &Claims, secret: &[u8]) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "viewer@example.com", Duration::hours(1));

        let actor = JwtVerifier::new(SECRET)
            .verify(&token_for(&claims, SECRET))
            .unwrap();

        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.email, "viewer@example.com");
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "viewer@example.com", Duration::hours(1));

        let result = JwtVerifier::new(SECRET).verify(&token_for(&claims, b"other-secret"));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let claims = Claims::new(Uuid::new_v4(), "viewer@example.com", Duration::hours(-2));

        let result = JwtVerifier::new(SECRET).verify(&token_for(&claims, SECRET));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_rejects_non_uuid_subject() {
        let mut claims = Claims::new(Uuid::new_v4(), "viewer@example.com", Duration::hours(1));
        claims.sub = "12345".to_string();

        let result = JwtVerifier::new(SECRET).verify(&token_for(&claims, SECRET));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(JwtVerifier::bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(JwtVerifier::bearer_token("Basic abc").is_err());
        assert!(JwtVerifier::bearer_token("Bearer ").is_err());
    }
}
