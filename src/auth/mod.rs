use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_JWT_EXPIRY_HOURS;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Session token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys for session tokens
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl JwtKeys {
    /// `expiry_hours` is capped at [`MAX_JWT_EXPIRY_HOURS`]
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64),
        }
    }

    /// Sign a token for `user_id` that expires after the configured window
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Salted Argon2id hash in PHC string form
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("pw12345678").unwrap();
        assert_ne!(hash, "pw12345678");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw12345678", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw12345678").unwrap();
        let b = hash_password("pw12345678").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn issued_token_carries_identity_and_24h_expiry() {
        let keys = JwtKeys::new("test-secret", 24);
        let token = keys.issue(42, "a@x.com").unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "a@x.com");
        let expected = Utc::now().timestamp() + 24 * 3600;
        assert!((claims.exp - expected).abs() <= 5, "exp {} vs {}", claims.exp, expected);
    }

    #[test]
    fn oversized_expiry_is_capped() {
        let keys = JwtKeys::new("test-secret", u64::MAX);
        let token = keys.issue(1, "a@x.com").unwrap();
        let claims = keys.verify(&token).unwrap();

        let expected = Utc::now().timestamp() + MAX_JWT_EXPIRY_HOURS as i64 * 3600;
        assert!((claims.exp - expected).abs() <= 5, "exp {} vs {}", claims.exp, expected);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("test-secret", 24);
        let past = Utc::now().timestamp() - 60;
        let token = keys
            .sign(&Claims {
                user_id: 1,
                email: "a@x.com".into(),
                iat: past - 3600,
                exp: past,
            })
            .unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::new("secret-a", 24).issue(1, "a@x.com").unwrap();
        assert!(JwtKeys::new("secret-b", 24).verify(&token).is_err());
        assert!(JwtKeys::new("secret-a", 24).verify("not.a.token").is_err());
    }

    #[test]
    fn claims_use_camel_case_user_id() {
        let claims = Claims { user_id: 7, email: "e@x.com".into(), iat: 0, exp: 1 };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["userId"], 7);
    }
}
