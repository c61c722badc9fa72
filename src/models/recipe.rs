// ABOUTME: Recipe models
// ABOUTME: Stored recipe row plus the validated create and update inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IngredientAmount;

/// Stored recipe row; tags and ingredients live in join tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub author_id: i64,
    /// Title
    pub name: String,
    /// Image path relative to the media root
    pub image: String,
    /// Description and instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Title
    pub name: String,
    /// Stored image path
    pub image: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Tag ids, deduplicated and non-empty
    pub tags: Vec<i64>,
    /// Ingredient amounts, deduplicated and non-empty
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated partial update; join sets are always replaced
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    /// New title
    pub name: Option<String>,
    /// New stored image path
    pub image: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// Replacement tag set
    pub tags: Vec<i64>,
    /// Replacement ingredient set
    pub ingredients: Vec<IngredientAmount>,
}
