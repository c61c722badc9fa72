// ABOUTME: Request authentication from the Authorization header
// ABOUTME: Accepts `Token <t>` or `Bearer <t>` and checks the token id against issued tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderMap;

use crate::auth::{AuthManager, AuthResult};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

const TOKEN_SCHEMES: [&str; 2] = ["Token ", "Bearer "];

/// Middleware for header-based token authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    database: Arc<Database>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Arc<Database>) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request that must carry credentials
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` without an Authorization header and
    /// `AUTH_INVALID` when the token is rejected
    #[tracing::instrument(
        skip(self, headers),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub async fn authenticate_request_with_headers(
        &self,
        headers: &HeaderMap,
    ) -> AppResult<AuthResult> {
        self.authenticate_optional(headers)
            .await?
            .ok_or_else(AppError::auth_required)
    }

    /// Authenticate when credentials are present; anonymous requests yield `None`
    ///
    /// A present but invalid token is still an error.
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` when the header is malformed or the token rejected
    pub async fn authenticate_optional(&self, headers: &HeaderMap) -> AppResult<Option<AuthResult>> {
        let Some(header) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let header = header
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))?;

        let token = extract_token(header).ok_or_else(|| {
            tracing::warn!("Authentication failed: unsupported authorization scheme");
            AppError::auth_invalid(
                "Invalid authorization header format - must be 'Token <token>' or 'Bearer <token>'",
            )
        })?;

        let result = self.authenticate_token(token).await;
        let span = tracing::Span::current();
        match &result {
            Ok(auth) => {
                span.record("user_id", auth.user_id).record("success", true);
                tracing::debug!(user.id = auth.user_id, "Token authentication successful");
            }
            Err(e) => {
                span.record("success", false);
                tracing::warn!("Token authentication failed: {}", e.message);
            }
        }
        result.map(Some)
    }

    async fn authenticate_token(&self, token: &str) -> AppResult<AuthResult> {
        let claims = self
            .auth_manager
            .validate_token(token)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

        if !self
            .database
            .is_auth_token_active(&claims.jti, user_id)
            .await?
        {
            return Err(AppError::auth_invalid("Token has been revoked"));
        }

        Ok(AuthResult {
            user_id,
            jti: claims.jti,
        })
    }
}

/// Authenticated caller for handlers that also read a request body
///
/// Resolved from the headers alone, so anonymous writes are turned away
/// with 401 before any body is buffered or parsed.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthResult);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        resources
            .auth_middleware
            .authenticate_request_with_headers(&parts.headers)
            .await
            .map(Self)
    }
}

/// Token from a `Token <t>` or `Bearer <t>` header value
fn extract_token(header: &str) -> Option<&str> {
    TOKEN_SCHEMES
        .iter()
        .find_map(|scheme| header.strip_prefix(scheme))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
