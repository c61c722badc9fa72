// ABOUTME: Recipe route handlers for CRUD, favorites, shopping cart and list download
// ABOUTME: Accepts JSON or multipart recipe bodies and keeps stored images in step with records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Recipe routes
//!
//! Reads are open to anonymous visitors. Writes require a token, and only
//! the author may change or delete a recipe. A recipe body is either JSON
//! with an inline `data:` image or `multipart/form-data` with a file part.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use foodgram_core::pagination::Page;

use super::{body_rejection, page_request, parse_id, ApiJson, ApiQuery};
use crate::auth::AuthResult;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::filters::RecipeListQuery;
use crate::logging::AppLogger;
use crate::middleware::AuthUser;
use crate::models::{MembershipKind, NewRecipe, Recipe, RecipeChanges};
use crate::representation::Presenter;
use crate::resources::ServerResources;
use crate::shopping_list;
use crate::validation::{
    ImageInput, IngredientAmountPayload, RecipeInput, RecipePayload, ValidatedRecipe, WriteMode,
};

// ============================================================================
// Request body
// ============================================================================

/// Recipe write body, read from JSON or `multipart/form-data`
#[derive(Debug)]
pub struct RecipeBody(pub RecipeInput);

#[async_trait]
impl<S> FromRequest<S> for RecipeBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| body_rejection(rejection.status(), rejection.body_text()))?;
            read_multipart(multipart).await.map(Self)
        } else {
            let ApiJson(payload) = ApiJson::<RecipePayload>::from_request(req, state).await?;
            Ok(Self(payload.into()))
        }
    }
}

/// Collect multipart fields; `tags` may repeat or hold a JSON list, `ingredients` holds a JSON list
async fn read_multipart(mut multipart: Multipart) -> AppResult<RecipeInput> {
    let mut input = RecipeInput::default();
    let mut errors = ValidationErrors::new();
    let mut tags: Option<Vec<i64>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_rejection(e.status(), format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" && field.file_name().is_some() {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| body_rejection(e.status(), format!("Failed to read image upload: {e}")))?;
            input.image = Some(ImageInput::Upload {
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| body_rejection(e.status(), format!("Failed to read field '{name}': {e}")))?;

        match name.as_str() {
            "name" => input.name = Some(value),
            "text" => input.text = Some(value),
            "image" => input.image = Some(ImageInput::DataUri(value)),
            "cooking_time" => match value.trim().parse() {
                Ok(minutes) => input.cooking_time = Some(minutes),
                Err(_) => errors.add("cooking_time", "A valid integer is required."),
            },
            "tags" => match parse_tag_ids(&value) {
                Ok(ids) => tags.get_or_insert_with(Vec::new).extend(ids),
                Err(message) => errors.add("tags", message),
            },
            "ingredients" => match serde_json::from_str::<Vec<IngredientAmountPayload>>(&value) {
                Ok(items) => input.ingredients.get_or_insert_with(Vec::new).extend(items),
                Err(_) => errors.add(
                    "ingredients",
                    "Expected a JSON list of objects with \"id\" and \"amount\".",
                ),
            },
            _ => {}
        }
    }

    errors.into_result()?;
    input.tags = tags;
    Ok(input)
}

/// Tag ids from `1`, `1,2` or `[1, 2]`
fn parse_tag_ids(value: &str) -> Result<Vec<i64>, String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|_| format!("Expected a list of tag ids, received \"{trimmed}\"."));
    }
    trimmed
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Incorrect type. Expected pk value, received \"{trimmed}\"."))
}

// ============================================================================
// Routes
// ============================================================================

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        ApiQuery(query): ApiQuery<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth_middleware
            .authenticate_optional(&headers)
            .await?
            .map(|auth| auth.user_id);
        let (page_query, filter) = query.into_parts();
        let page = page_request(page_query, &resources.config.api)?;

        let (recipes, total) = resources
            .database
            .list_recipes(&filter, viewer, page)
            .await?;
        let results = Presenter::new(&resources.database, &resources.media, viewer)
            .recipes(recipes)
            .await?;
        let page = Page::new(results, total, page, uri.path(), uri.query())?;
        Ok(Json(page).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = parse_id(&id, "Recipe")?;
        let viewer = resources
            .auth_middleware
            .authenticate_optional(&headers)
            .await?
            .map(|auth| auth.user_id);

        let recipe = Self::load_recipe(&resources, recipe_id).await?;
        let response = Presenter::new(&resources.database, &resources.media, viewer)
            .recipe(recipe)
            .await?;
        Ok(Json(response).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        AuthUser(auth): AuthUser,
        RecipeBody(input): RecipeBody,
    ) -> Result<Response, AppError> {
        let ValidatedRecipe {
            name,
            image,
            text,
            cooking_time,
            tags,
            ingredients,
        } = input
            .validate(&resources.database, &resources.config.api, WriteMode::Create)
            .await?;
        let image = image.ok_or_else(|| AppError::field("image", "This field is required."))?;

        let image_path = resources.media.save_recipe_image(&image).await?;
        let new_recipe = NewRecipe {
            name: name.unwrap_or_default(),
            image: image_path.clone(),
            text: text.unwrap_or_default(),
            cooking_time: cooking_time.unwrap_or_default(),
            tags,
            ingredients,
        };

        let recipe_id = match resources
            .database
            .create_recipe(auth.user_id, &new_recipe)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                resources.media.delete(&image_path).await;
                return Err(e);
            }
        };

        AppLogger::log_resource_event(auth.user_id, "recipe", recipe_id, "create");
        let recipe = Self::load_recipe(&resources, recipe_id).await?;
        let response = Presenter::new(&resources.database, &resources.media, Some(auth.user_id))
            .recipe(recipe)
            .await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        AuthUser(auth): AuthUser,
        Path(id): Path<String>,
        RecipeBody(input): RecipeBody,
    ) -> Result<Response, AppError> {
        let recipe_id = parse_id(&id, "Recipe")?;
        let existing = Self::load_owned_recipe(&resources, &auth, recipe_id).await?;

        let ValidatedRecipe {
            name,
            image,
            text,
            cooking_time,
            tags,
            ingredients,
        } = input
            .validate(&resources.database, &resources.config.api, WriteMode::Update)
            .await?;

        let new_image = match image {
            Some(image) => Some(resources.media.save_recipe_image(&image).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name,
            image: new_image.clone(),
            text,
            cooking_time,
            tags,
            ingredients,
        };

        if let Err(e) = resources.database.update_recipe(recipe_id, &changes).await {
            if let Some(path) = &new_image {
                resources.media.delete(path).await;
            }
            return Err(e);
        }
        if new_image.is_some() {
            resources.media.delete(&existing.image).await;
        }

        AppLogger::log_resource_event(auth.user_id, "recipe", recipe_id, "update");
        let recipe = Self::load_recipe(&resources, recipe_id).await?;
        let response = Presenter::new(&resources.database, &resources.media, Some(auth.user_id))
            .recipe(recipe)
            .await?;
        Ok(Json(response).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;
        let recipe_id = parse_id(&id, "Recipe")?;
        let recipe = Self::load_owned_recipe(&resources, &auth, recipe_id).await?;

        if !resources.database.delete_recipe(recipe_id).await? {
            return Err(AppError::not_found("Recipe"));
        }
        resources.media.delete(&recipe.image).await;

        AppLogger::log_resource_event(auth.user_id, "recipe", recipe_id, "delete");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, &id, MembershipKind::Favorite).await
    }

    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, &id, MembershipKind::Favorite).await
    }

    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, &id, MembershipKind::ShoppingCart).await
    }

    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, &id, MembershipKind::ShoppingCart).await
    }

    /// Plain-text list of every ingredient in the viewer's cart, summed per (name, unit)
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)
            .await?;

        if !resources.database.has_cart_entries(auth.user_id).await? {
            return Err(AppError::invalid_input("Shopping cart is empty"));
        }
        let user = resources
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let lines = resources.database.shopping_cart_lines(auth.user_id).await?;
        let items = shopping_list::aggregate(lines);
        let document = shopping_list::render(&user.username, &items);

        let disposition = format!(
            "attachment; filename=\"{}\"",
            shopping_list::filename(&user.username)
        );
        let disposition = HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"shopping_list.txt\""));

        tracing::info!(
            user.id = auth.user_id,
            shopping_list.items = items.len(),
            "Shopping list downloaded"
        );
        Ok((
            StatusCode::OK,
            [
                (
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (CONTENT_DISPOSITION, disposition),
            ],
            document,
        )
            .into_response())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn load_recipe(resources: &ServerResources, recipe_id: i64) -> AppResult<Recipe> {
        resources
            .database
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))
    }

    /// Load a recipe the caller authored; 404 if unknown, 403 for anyone else
    async fn load_owned_recipe(
        resources: &ServerResources,
        auth: &AuthResult,
        recipe_id: i64,
    ) -> AppResult<Recipe> {
        let recipe = Self::load_recipe(resources, recipe_id).await?;
        if recipe.author_id != auth.user_id {
            tracing::warn!(
                user.id = auth.user_id,
                recipe.id = recipe_id,
                "Rejected change to another author's recipe"
            );
            return Err(AppError::permission_denied(
                "Only the author may change this recipe",
            ));
        }
        Ok(recipe)
    }

    /// Unknown recipe is a 400 here, unlike the 404 of the detail endpoints
    async fn add_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(headers)
            .await?;
        let recipe_id = parse_id(id, "Recipe")?;
        let recipe = resources
            .database
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::invalid_input("Recipe does not exist"))?;

        resources
            .database
            .add_membership(kind, auth.user_id, recipe.id)
            .await?;
        AppLogger::log_resource_event(auth.user_id, kind.table(), recipe.id, "create");

        let response =
            Presenter::new(&resources.database, &resources.media, Some(auth.user_id))
                .short_recipe(&recipe);
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn remove_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(headers)
            .await?;
        let recipe_id = parse_id(id, "Recipe")?;
        Self::load_recipe(resources, recipe_id).await?;

        if !resources
            .database
            .remove_membership(kind, auth.user_id, recipe_id)
            .await?
        {
            return Err(AppError::invalid_input(format!(
                "Recipe is not in {}",
                kind.label()
            )));
        }

        AppLogger::log_resource_event(auth.user_id, kind.table(), recipe_id, "delete");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
