//! JWT access-token validation
//!
//! Tokens are issued by the account service and share its HS256 secret.
//! Minting is kept for tests and local tooling.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type; only "access" is accepted here
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Session the token belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Pre-computed JWT keys, created once at startup
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
        }
    }

    /// Mint an access token for a user
    pub fn generate_access_token(&self, user_id: Uuid, email: Option<&str>) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: "access".to_string(),
            email: email.map(str::to_string),
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    /// Validate signature and expiry, then require an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != "access" {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, Some("sam@example.com"))
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn test_refresh_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
            token_type: "refresh".to_string(),
            email: None,
            jti: None,
        };
        let token = encode(&Header::default(), &claims, &service.keys.encoding).unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_test_service()
            .generate_access_token(Uuid::new_v4(), None)
            .unwrap();
        let other = JwtService::new("another-secret", 3600);
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret", -3600);
        let token = service.generate_access_token(Uuid::new_v4(), None).unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_access_token("invalid.token.here").is_err());
    }
}
