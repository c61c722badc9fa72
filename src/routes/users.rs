// ABOUTME: User route handlers for registration, profiles, passwords and subscriptions
// ABOUTME: Covers the users collection, /me, set_password and the follow/unfollow actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! User routes
//!
//! Listing and profile lookups are open to anonymous visitors, with
//! `is_subscribed` computed for the viewer when a token is presented.
//! Everything under `me`, `set_password` and the subscription endpoints
//! requires authentication.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use foodgram_core::pagination::{Page, PageQuery};
use serde::{Deserialize, Serialize};

use super::{page_request, parse_id, ApiJson, ApiQuery};
use crate::errors::{AppError, ValidationErrors};
use crate::logging::AppLogger;
use crate::models::{NewUser, User};
use crate::representation::Presenter;
use crate::resources::ServerResources;
use crate::validation::{validate_password, RegisterUserPayload, SetPasswordPayload};

// ============================================================================
// Request / Response Types
// ============================================================================

/// Registration response (no viewer-dependent fields)
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    /// Login email
    pub email: String,
    /// User id
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Query of the subscription endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriptionQuery {
    /// One-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
    /// Cap on each author's recipe preview
    pub recipes_limit: Option<i64>,
}

impl SubscriptionQuery {
    fn page_query(self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    fn recipes_limit(self) -> Option<i64> {
        self.recipes_limit.filter(|limit| *limit >= 0)
    }
}

// ============================================================================
// Routes
// ============================================================================

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/",
                get(Self::handle_list).post(Self::handle_register),
            )
            .route("/api/users/me/", get(Self::handle_me))
            .route("/api/users/set_password/", post(Self::handle_set_password))
            .route(
                "/api/users/subscriptions/",
                get(Self::handle_subscriptions),
            )
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        ApiQuery(query): ApiQuery<PageQuery>,
    ) -> Result<Response, AppError> {
        let viewer = resources.auth_middleware.authenticate_optional(&headers).await?;
        let page = page_request(query, &resources.config.api)?;

        let (users, total) = resources.database.list_users(page).await?;
        let presenter = Presenter::new(
            &resources.database,
            &resources.media,
            viewer.map(|auth| auth.user_id),
        );
        let results = presenter.users(users).await?;
        let page = Page::new(results, total, page, uri.path(), uri.query())?;
        Ok(Json(page).into_response())
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(payload): ApiJson<RegisterUserPayload>,
    ) -> Result<Response, AppError> {
        let registration = payload.validate(&resources.database).await?;
        let password_hash = resources
            .auth_manager
            .hash_password(&registration.password)
            .await?;

        let user = resources
            .database
            .create_user(&NewUser {
                email: registration.email,
                username: registration.username,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
            })
            .await?;

        AppLogger::log_auth_event(Some(user.id), "register", true);
        Ok((
            StatusCode::CREATED,
            Json(RegisteredUserResponse::from(user)),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user_id = parse_id(&id, "User")?;
        let viewer = resources.auth_middleware.authenticate_optional(&headers).await?;

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        let presenter = Presenter::new(
            &resources.database,
            &resources.media,
            viewer.map(|auth| auth.user_id),
        );
        Ok(Json(presenter.user(user).await?).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;

        let user = resources
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        let presenter = Presenter::new(&resources.database, &resources.media, Some(auth.user_id));
        Ok(Json(presenter.user(user).await?).into_response())
    }

    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(payload): ApiJson<SetPasswordPayload>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;
        let user = resources
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut errors = ValidationErrors::new();
        match payload.current_password.as_deref() {
            None => errors.add("current_password", "This field is required."),
            Some(current) => {
                if !resources
                    .auth_manager
                    .verify_password(current, &user.password_hash)
                    .await?
                {
                    errors.add("current_password", "Invalid password.");
                }
            }
        }
        match payload.new_password.as_deref() {
            None => errors.add("new_password", "This field is required."),
            Some(new_password) => validate_password(
                &mut errors,
                "new_password",
                new_password,
                Some(&user.username),
                Some(&user.email),
            ),
        }
        errors.into_result()?;

        let new_password = payload.new_password.unwrap_or_default();
        let password_hash = resources.auth_manager.hash_password(&new_password).await?;
        resources
            .database
            .update_password(user.id, &password_hash)
            .await?;

        AppLogger::log_auth_event(Some(user.id), "set_password", true);
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        ApiQuery(query): ApiQuery<SubscriptionQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;
        let page = page_request(query.page_query(), &resources.config.api)?;

        let (authors, total) = resources
            .database
            .list_subscriptions(auth.user_id, page)
            .await?;
        let presenter = Presenter::new(&resources.database, &resources.media, Some(auth.user_id));
        let results = presenter
            .subscriptions(authors, query.recipes_limit())
            .await?;
        let page = Page::new(results, total, page, uri.path(), uri.query())?;
        Ok(Json(page).into_response())
    }

    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ApiQuery(query): ApiQuery<SubscriptionQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;
        let author_id = parse_id(&id, "User")?;
        let author = resources
            .database
            .get_user(author_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        resources
            .database
            .subscribe(auth.user_id, author.id)
            .await?;
        AppLogger::log_resource_event(auth.user_id, "subscription", author.id, "create");

        let presenter = Presenter::new(&resources.database, &resources.media, Some(auth.user_id));
        let mut response = presenter
            .subscriptions(vec![author], query.recipes_limit())
            .await?;
        let response = response
            .pop()
            .ok_or_else(|| AppError::internal("Subscription representation was empty"))?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;
        let author_id = parse_id(&id, "User")?;
        if resources.database.get_user(author_id).await?.is_none() {
            return Err(AppError::not_found("User"));
        }

        if !resources
            .database
            .unsubscribe(auth.user_id, author_id)
            .await?
        {
            return Err(AppError::invalid_input(
                "You are not subscribed to this author",
            ));
        }

        AppLogger::log_resource_event(auth.user_id, "subscription", author_id, "delete");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
