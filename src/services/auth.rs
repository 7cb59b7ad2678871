// src/services/auth.rs
// DOCUMENTATION: Password hashing and JWT operations
// PURPOSE: Argon2 hashes for stored passwords, HS256 tokens for sessions and password resets

use crate::errors::ApiError;
use crate::models::{User, UserRole};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Password reset token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: Uuid,
    pub email: String,
    /// Always "password_reset"; keeps access tokens from being accepted here
    pub purpose: String,
    pub iat: i64,
    pub exp: i64,
}

const RESET_PURPOSE: &str = "password_reset";

/// Password hashing utilities
pub struct PasswordAuth;

impl PasswordAuth {
    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                log::error!("Failed to hash password: {}", e);
                ApiError::InternalError("Failed to hash password".to_string())
            })
    }

    /// Verify a password against a stored hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            log::error!("Invalid password hash format: {}", e);
            ApiError::InternalError("Invalid password hash".to_string())
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// JWT token utilities
pub struct JwtAuth;

impl JwtAuth {
    /// Create an access token for a user
    pub fn create_token(user: &User, secret: &str, expires_in_secs: i64) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + expires_in_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    /// Verify and decode an access token
    pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            log::debug!("Rejected access token: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })
    }

    /// Create a short-lived token that authorizes one password reset
    pub fn create_reset_token(
        user: &User,
        secret: &str,
        expires_in_secs: i64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = ResetClaims {
            sub: user.id,
            email: user.email.clone(),
            purpose: RESET_PURPOSE.to_string(),
            iat: now,
            exp: now + expires_in_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::InternalError(format!("Failed to create reset token: {}", e)))
    }

    /// Verify a reset token and check it was issued for `email`
    pub fn verify_reset_token(token: &str, email: &str, secret: &str) -> Result<ResetClaims, ApiError> {
        let claims = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired reset token".to_string()))?;

        if claims.purpose != RESET_PURPOSE || !claims.email.eq_ignore_ascii_case(email) {
            return Err(ApiError::Unauthorized(
                "Invalid or expired reset token".to_string(),
            ));
        }
        Ok(claims)
    }
}
