// ABOUTME: Tag route handlers
// ABOUTME: Read-only listing and lookup of recipe tags with resolved color names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::parse_id;
use crate::errors::AppError;
use crate::representation::TagResponse;
use crate::resources::ServerResources;

/// Tag routes
pub struct TagRoutes;

impl TagRoutes {
    /// Create all tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags/", get(Self::handle_list))
            .route("/api/tags/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// All tags ordered by name, not paginated
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags: Vec<TagResponse> = resources
            .database
            .list_tags()
            .await?
            .into_iter()
            .map(TagResponse::from)
            .collect();
        Ok(Json(tags).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tag_id = parse_id(&id, "Tag")?;
        let tag = resources
            .database
            .get_tag(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag"))?;
        Ok(Json(TagResponse::from(tag)).into_response())
    }
}
