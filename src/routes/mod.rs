// ABOUTME: Route module organization for the recipe API endpoints
// ABOUTME: Per-entity routers plus the extractors and helpers they share
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Route module for the Foodgram API
//!
//! Each domain module exposes a `XxxRoutes::routes(resources)` router with
//! thin handlers that validate input, call the store and build responses
//! through [`crate::representation::Presenter`].

/// Token login and logout
pub mod auth;
/// Health check routes
pub mod health;
/// Ingredient lookup routes
pub mod ingredients;
/// Recipe CRUD, membership toggles and the shopping list download
pub mod recipes;
/// Tag lookup routes
pub mod tags;
/// Registration, profiles, passwords and subscriptions
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use tags::TagRoutes;
pub use users::UserRoutes;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::pagination::{PageQuery, PageRequest};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::errors::{AppError, AppResult};

/// JSON body extractor that reports malformed input as a 400 `INVALID_INPUT`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| body_rejection(rejection.status(), rejection.body_text()))
    }
}

/// Query string extractor supporting repeated keys, reporting errors as 400
#[derive(Debug, Clone, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum_extra::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum_extra::extract::Query(value)| Self(value))
            .map_err(|rejection| AppError::invalid_input(format!("Invalid query string: {rejection}")))
    }
}

/// 413 when the body limit was hit, 400 for any other unreadable body
pub(crate) fn body_rejection(status: StatusCode, message: impl Into<String>) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(message)
    } else {
        AppError::invalid_input(message)
    }
}

/// Parse a numeric path id; anything else names no resource
pub(crate) fn parse_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::not_found(resource))
}

/// Resolve `page` and `limit` against the configured bounds
pub(crate) fn page_request(query: PageQuery, api: &ApiConfig) -> AppResult<PageRequest> {
    PageRequest::resolve(query, api.page_size, api.max_page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "Recipe").unwrap(), 42);
        for raw in ["abc", "0", "-3", "4.5", ""] {
            let err = parse_id(raw, "Recipe").unwrap_err();
            assert_eq!(err.http_status(), 404, "{raw}");
            assert_eq!(err.message, "Recipe not found");
        }
    }
}
