// ABOUTME: Token-based user authentication and password hashing
// ABOUTME: Issues and validates HS256 tokens carrying a revocable token id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Authentication
//!
//! Login issues an HS256-signed JWT whose `jti` claim is persisted in the
//! `auth_tokens` table. A token authenticates only while its signature,
//! expiry and audience check out and its `jti` row is still present, so
//! logout revokes exactly the presented token.

use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use foodgram_core::constants::service_names::API_AUDIENCE;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "Token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "Token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "Token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Token `ID`, matched against the issued-token table
    pub jti: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// A freshly signed token and the metadata persisted for it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded token returned to the client
    pub token: String,
    /// Token `ID`
    pub jti: String,
    /// Issue time
    pub issued_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

/// Authenticated request context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: i64,
    /// `ID` of the token the request presented
    pub jti: String,
}

/// Authentication manager for tokens and password hashes
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a new authentication manager from a signing secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    /// Create from configuration, generating a random secret when none is set
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        match &config.jwt_secret {
            Some(secret) => Self::new(
                secret.as_bytes(),
                config.jwt_expiry_hours,
                config.bcrypt_cost,
            ),
            None => {
                tracing::warn!("JWT_SECRET not set; generated an ephemeral signing secret");
                Self::new(
                    &generate_jwt_secret(),
                    config.jwt_expiry_hours,
                    config.bcrypt_cost,
                )
            }
        }
    }

    /// Generate a signed token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT` encoding fails
    pub fn generate_token(&self, user_id: i64) -> Result<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(self.token_expiry_hours);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            jti: jti.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: API_AUDIENCE.to_owned(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode auth token")?;

        Ok(IssuedToken {
            token,
            jti,
            issued_at,
            expires_at,
        })
    }

    /// Validate a token's signature, audience and expiry
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_audience(&[API_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(token, &e))
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(token: &str, e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::debug!("Token validation failed: {e}");

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::peek_expiry(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token was issued for another audience".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Read the `exp` claim of an already rejected token for error reporting
    fn peek_expiry(token: &str) -> Option<DateTime<Utc>> {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine as _;

        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(claims.get("exp")?.as_i64()?, 0)
    }

    /// Hash a password with bcrypt on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
    }

    /// Check a password against a stored bcrypt hash on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an internal error if the blocking task fails
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            bcrypt::verify(&password, &password_hash).unwrap_or(false)
        })
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
    }
}

/// Generate a random `JWT` secret
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill(&mut secret[..]);
    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        AuthManager::new(b"test-secret-for-unit-tests", 24, 4)
    }

    #[test]
    fn test_generate_and_validate_token() {
        let auth = manager();
        let issued = auth.generate_token(42).unwrap();
        let claims = auth.validate_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.aud, API_AUDIENCE);
        assert!(issued.expires_at > issued.issued_at);
    }

    #[test]
    fn test_tokens_have_unique_ids() {
        let auth = manager();
        let first = auth.generate_token(1).unwrap();
        let second = auth.generate_token(1).unwrap();
        assert_ne!(first.jti, second.jti);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let other = AuthManager::new(b"another-secret", 24, 4);
        let issued = other.generate_token(1).unwrap();
        assert!(matches!(
            manager().validate_token(&issued.token),
            Err(JwtValidationError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let auth = AuthManager::new(b"test-secret-for-unit-tests", -1, 4);
        let issued = auth.generate_token(1).unwrap();
        match auth.validate_token(&issued.token) {
            Err(JwtValidationError::TokenExpired { expired_at }) => {
                assert_eq!(expired_at.timestamp(), issued.expires_at.timestamp());
            }
            other => panic!("expected expiry error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            manager().validate_token("not-a-token"),
            Err(JwtValidationError::TokenMalformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let auth = manager();
        let hash = auth.hash_password("correct horse").await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(auth.verify_password("correct horse", &hash).await.unwrap());
        assert!(!auth.verify_password("wrong horse", &hash).await.unwrap());
        assert!(!auth.verify_password("anything", "not-a-hash").await.unwrap());
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
    }
}
