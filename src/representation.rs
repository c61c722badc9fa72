// ABOUTME: Response payloads and the batch loaders that build them
// ABOUTME: Computes per-viewer flags (is_subscribed, is_favorited, is_in_shopping_cart) in bulk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Response representations
//!
//! [`Presenter`] turns stored rows into response payloads for one viewer.
//! Lists are built with a fixed number of queries: one per related table,
//! each filtered by `IN (...)` over the page's ids.

use serde::Serialize;

use crate::colors;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::media::MediaStorage;
use crate::models::{MembershipKind, Recipe, RecipeIngredient, Tag, User};

/// Public user fields plus whether the viewer follows them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
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
    /// Whether the viewer is subscribed (always false for anonymous viewers)
    pub is_subscribed: bool,
}

impl UserResponse {
    /// Build from a stored user
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Followed author with a preview of their recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionResponse {
    /// Author fields
    #[serde(flatten)]
    pub author: UserResponse,
    /// Newest recipes, capped by `recipes_limit`
    pub recipes: Vec<RecipeShortResponse>,
    /// Total recipes by the author
    pub recipes_count: i64,
}

/// Tag with its color name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagResponse {
    /// Tag id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Stored hex color
    pub color: String,
    /// CSS3 name of the color, if it has one
    pub color_name: Option<&'static str>,
    /// Slug
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            color_name: colors::color_name(&tag.color),
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

/// Full recipe read representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Tags, ordered by name
    pub tags: Vec<TagResponse>,
    /// Author
    pub author: UserResponse,
    /// Ingredients with amounts, ordered by name
    pub ingredients: Vec<RecipeIngredient>,
    /// Whether the viewer favorited it
    pub is_favorited: bool,
    /// Whether it is in the viewer's cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Image URL
    pub image: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

/// Condensed recipe used by membership toggles and subscription previews
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShortResponse {
    /// Recipe id
    pub id: i64,
    /// Title
    pub name: String,
    /// Image URL
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

/// Builds representations for one viewer
#[derive(Clone, Copy)]
pub struct Presenter<'a> {
    database: &'a Database,
    media: &'a MediaStorage,
    viewer: Option<i64>,
}

impl<'a> Presenter<'a> {
    /// Create a presenter; `viewer` is `None` for anonymous requests
    #[must_use]
    pub const fn new(database: &'a Database, media: &'a MediaStorage, viewer: Option<i64>) -> Self {
        Self {
            database,
            media,
            viewer,
        }
    }

    /// Represent one user
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription lookup fails
    pub async fn user(&self, user: User) -> AppResult<UserResponse> {
        let mut users = self.users(vec![user]).await?;
        users
            .pop()
            .ok_or_else(|| AppError::internal("User representation was empty"))
    }

    /// Represent users in order
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription lookup fails
    pub async fn users(&self, users: Vec<User>) -> AppResult<Vec<UserResponse>> {
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let followed = match self.viewer {
            Some(viewer) => self.database.subscribed_author_ids(viewer, &ids).await?,
            None => Default::default(),
        };

        Ok(users
            .into_iter()
            .map(|user| {
                let is_subscribed = followed.contains(&user.id);
                UserResponse::new(user, is_subscribed)
            })
            .collect())
    }

    /// Represent followed authors with capped recipe previews
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails
    pub async fn subscriptions(
        &self,
        authors: Vec<User>,
        recipes_limit: Option<i64>,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        let ids: Vec<i64> = authors.iter().map(|u| u.id).collect();
        let mut previews = self.database.recipes_by_authors(&ids, recipes_limit).await?;
        let counts = self.database.recipe_counts(&ids).await?;

        Ok(self
            .users(authors)
            .await?
            .into_iter()
            .map(|author| {
                let recipes = previews
                    .remove(&author.id)
                    .unwrap_or_default()
                    .iter()
                    .map(|recipe| self.short_recipe(recipe))
                    .collect();
                let recipes_count = counts.get(&author.id).copied().unwrap_or(0);
                SubscriptionResponse {
                    author,
                    recipes,
                    recipes_count,
                }
            })
            .collect())
    }

    /// Represent one recipe
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails
    pub async fn recipe(&self, recipe: Recipe) -> AppResult<RecipeResponse> {
        let mut recipes = self.recipes(vec![recipe]).await?;
        recipes
            .pop()
            .ok_or_else(|| AppError::internal("Recipe representation was empty"))
    }

    /// Represent recipes in order
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails
    pub async fn recipes(&self, recipes: Vec<Recipe>) -> AppResult<Vec<RecipeResponse>> {
        let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags = self.database.tags_for_recipes(&recipe_ids).await?;
        let mut ingredients = self.database.ingredients_for_recipes(&recipe_ids).await?;
        let authors: Vec<User> = self
            .database
            .users_by_ids(&author_ids)
            .await?
            .into_values()
            .collect();
        let authors = self.users(authors).await?;

        let (favorited, in_cart) = match self.viewer {
            Some(viewer) => (
                self.database
                    .listed_recipe_ids(MembershipKind::Favorite, viewer, &recipe_ids)
                    .await?,
                self.database
                    .listed_recipe_ids(MembershipKind::ShoppingCart, viewer, &recipe_ids)
                    .await?,
            ),
            None => Default::default(),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors
                    .iter()
                    .find(|a| a.id == recipe.author_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::database(format!("Author of recipe {} is missing", recipe.id))
                    })?;
                Ok(RecipeResponse {
                    id: recipe.id,
                    tags: tags
                        .remove(&recipe.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(TagResponse::from)
                        .collect(),
                    author,
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    image: self.media.url_for(&recipe.image),
                    name: recipe.name,
                    text: recipe.text,
                    cooking_time: recipe.cooking_time,
                })
            })
            .collect()
    }

    /// Condensed representation
    #[must_use]
    pub fn short_recipe(&self, recipe: &Recipe) -> RecipeShortResponse {
        RecipeShortResponse {
            id: recipe.id,
            name: recipe.name.clone(),
            image: self.media.url_for(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}
