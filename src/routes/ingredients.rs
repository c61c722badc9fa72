// ABOUTME: Ingredient route handlers
// ABOUTME: Case-insensitive name prefix search and single ingredient lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::{parse_id, ApiQuery};
use crate::errors::AppError;
use crate::filters::IngredientSearch;
use crate::resources::ServerResources;

/// Ingredient routes
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Ingredients ordered by name, optionally narrowed by `?name=<prefix>`
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        ApiQuery(search): ApiQuery<IngredientSearch>,
    ) -> Result<Response, AppError> {
        let ingredients = resources.database.search_ingredients(&search).await?;
        Ok(Json(ingredients).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let ingredient_id = parse_id(&id, "Ingredient")?;
        let ingredient = resources
            .database
            .get_ingredient(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;
        Ok(Json(ingredient).into_response())
    }
}
