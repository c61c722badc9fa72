// ABOUTME: Token login and logout route handlers
// ABOUTME: Exchanges email and password for a revocable auth token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::validation::LoginPayload;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Login response with token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token to send as `Authorization: Token <auth_token>`
    pub auth_token: String,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/token/login/", post(Self::handle_login))
            .route("/api/auth/token/logout/", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(payload): ApiJson<LoginPayload>,
    ) -> Result<Response, AppError> {
        let (email, password) = payload.credentials()?;

        let Some(user) = resources.database.get_user_by_email(&email).await? else {
            AppLogger::log_auth_event(None, "login", false);
            return Err(AppError::invalid_input(INVALID_CREDENTIALS));
        };

        if !resources
            .auth_manager
            .verify_password(&password, &user.password_hash)
            .await?
        {
            AppLogger::log_auth_event(Some(user.id), "login", false);
            return Err(AppError::invalid_input(INVALID_CREDENTIALS));
        }

        let issued = resources
            .auth_manager
            .generate_token(user.id)
            .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;
        let purged = resources
            .database
            .purge_expired_tokens(issued.issued_at)
            .await?;
        if purged > 0 {
            tracing::debug!(tokens.purged = purged, "Purged expired auth tokens");
        }
        resources
            .database
            .store_auth_token(&issued.jti, user.id, issued.issued_at, issued.expires_at)
            .await?;

        AppLogger::log_auth_event(Some(user.id), "login", true);
        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                auth_token: issued.token,
            }),
        )
            .into_response())
    }

    /// Handle logout; revokes only the presented token
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;

        resources.database.revoke_auth_token(&auth.jti).await?;
        AppLogger::log_auth_event(Some(auth.user_id), "logout", true);
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
