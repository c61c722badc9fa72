// ABOUTME: Ingredient database operations
// ABOUTME: Prefix search, lookup, existence checks and batch loading of recipe ingredient amounts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::{HashMap, HashSet};

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{map_write_error, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::filters::IngredientSearch;
use crate::models::{Ingredient, NewIngredient, RecipeIngredient};

impl Database {
    pub(super) async fn migrate_ingredients(&self) -> AppResult<()> {
        // name_lower backs case-insensitive prefix search for non-ASCII names
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) <= 256),
                name_lower TEXT NOT NULL,
                measurement_unit TEXT NOT NULL CHECK (length(measurement_unit) <= 256),
                UNIQUE (name, measurement_unit)
            )
            ",
            "ingredients table",
        )
        .await?;
        self.execute_schema(
            "CREATE INDEX IF NOT EXISTS idx_ingredients_name_lower ON ingredients(name_lower)",
            "ingredients index",
        )
        .await
    }

    /// Insert an ingredient
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` for a duplicate (name, unit) pair, or
    /// a database error
    pub async fn create_ingredient(&self, ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let result = sqlx::query(
            "INSERT INTO ingredients (name, name_lower, measurement_unit) VALUES ($1, $2, $3)",
        )
        .bind(&ingredient.name)
        .bind(ingredient.name.to_lowercase())
        .bind(&ingredient.measurement_unit)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "This ingredient already exists with the same unit",
                "Failed to create ingredient",
            )
        })?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        })
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ingredient(&self, ingredient_id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_ingredient))
    }

    /// Ingredients ordered by name, optionally narrowed by a name prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_ingredients(&self, search: &IngredientSearch) -> AppResult<Vec<Ingredient>> {
        let rows = match search.like_pattern() {
            Some(pattern) => {
                sqlx::query(
                    r"
                    SELECT id, name, measurement_unit FROM ingredients
                    WHERE name_lower LIKE $1 ESCAPE '\'
                    ORDER BY name, id
                    ",
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT id, name, measurement_unit FROM ingredients ORDER BY name, id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to search ingredients: {e}")))?;

        Ok(rows.iter().map(Self::row_to_ingredient).collect())
    }

    /// Which of the given ids exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_ingredient_ids(&self, ingredient_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if ingredient_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT id FROM ingredients WHERE id IN ({})",
            placeholders(ingredient_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in ingredient_ids {
            query = query.bind(id);
        }

        let ids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check ingredients: {e}")))?;
        Ok(ids.into_iter().collect())
    }

    /// Ingredient amounts of each listed recipe, each set ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn ingredients_for_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<RecipeIngredient>>> {
        let mut by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(by_recipe);
        }

        let sql = format!(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id IN ({})
            ORDER BY i.name, i.id
            ",
            placeholders(recipe_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in recipe_ids {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(RecipeIngredient {
                    id: row.get("id"),
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                    amount: row.get("amount"),
                });
        }
        Ok(by_recipe)
    }

    fn row_to_ingredient(row: &SqliteRow) -> Ingredient {
        Ingredient {
            id: row.get("id"),
            name: row.get("name"),
            measurement_unit: row.get("measurement_unit"),
        }
    }
}
