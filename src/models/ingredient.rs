// ABOUTME: Ingredient models
// ABOUTME: Reference ingredients, their per-recipe amounts and the amount pairs submitted by clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

/// Reference ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit the amount is expressed in
    pub measurement_unit: String,
}

/// Ingredient to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewIngredient {
    /// Display name
    pub name: String,
    /// Unit the amount is expressed in
    pub measurement_unit: String,
}

/// An ingredient as used by one recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient id (not the join row id)
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Quantity required by the recipe
    pub amount: i64,
}

/// Validated (ingredient, amount) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Referenced ingredient
    pub ingredient_id: i64,
    /// Quantity
    pub amount: i64,
}
