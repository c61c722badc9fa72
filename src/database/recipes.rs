// ABOUTME: Recipe database operations with tag and ingredient join tables
// ABOUTME: Transactional create and replace-on-update, filtered listing and author previews
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::Utc;
use foodgram_core::pagination::PageRequest;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, Transaction};

use super::{parse_timestamp, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::filters::RecipeFilter;
use crate::models::{IngredientAmount, NewRecipe, Recipe, RecipeChanges};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.created_at";

impl Database {
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL CHECK (length(name) <= 256),
                image TEXT NOT NULL,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time BETWEEN 1 AND 32767),
                created_at TEXT NOT NULL
            )
            ",
            "recipes table",
        )
        .await?;
        self.execute_schema(
            "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
            "recipes index",
        )
        .await?;

        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                UNIQUE (recipe_id, tag_id)
            )
            ",
            "recipe_tags table",
        )
        .await?;
        self.execute_schema(
            "CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)",
            "recipe_tags index",
        )
        .await?;

        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 32767),
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
            "recipe_ingredients table",
        )
        .await
    }

    /// Insert a recipe with its tags and ingredient amounts in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is persisted then
    pub async fn create_recipe(&self, author_id: i64, recipe: &NewRecipe) -> AppResult<i64> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id)
        .bind(&recipe.name)
        .bind(&recipe.image)
        .bind(&recipe.text)
        .bind(recipe.cooking_time)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;
        let recipe_id = result.last_insert_rowid();

        insert_recipe_tags(&mut tx, recipe_id, &recipe.tags).await?;
        insert_recipe_ingredients(&mut tx, recipe_id, &recipe.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;
        Ok(recipe_id)
    }

    /// Apply scalar changes and replace the tag and ingredient sets in one transaction
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe vanished, or a database error
    pub async fn update_recipe(&self, recipe_id: i64, changes: &RecipeChanges) -> AppResult<()> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                name = COALESCE($1, name),
                image = COALESCE($2, image),
                text = COALESCE($3, text),
                cooking_time = COALESCE($4, cooking_time)
            WHERE id = $5
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.image.as_deref())
        .bind(changes.text.as_deref())
        .bind(changes.cooking_time)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;
        insert_recipe_tags(&mut tx, recipe_id, &changes.tags).await?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe ingredients: {e}")))?;
        insert_recipe_ingredients(&mut tx, recipe_id, &changes.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;
        Ok(())
    }

    /// Get a recipe row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Delete a recipe; join rows and memberships cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Newest-first page of recipes matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> AppResult<(Vec<Recipe>, i64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipes r WHERE 1 = 1");
        filter.push_conditions(&mut count_query, viewer);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE 1 = 1"));
        filter.push_conditions(&mut query, viewer);
        query
            .push(" ORDER BY r.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows
            .iter()
            .map(Self::row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((recipes, total))
    }

    /// Newest recipes of each author, at most `limit` per author when given
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipes_by_authors(
        &self,
        author_ids: &[i64],
        limit: Option<i64>,
    ) -> AppResult<HashMap<i64, Vec<Recipe>>> {
        let mut by_author: HashMap<i64, Vec<Recipe>> = HashMap::new();
        if author_ids.is_empty() {
            return Ok(by_author);
        }

        let sql = format!(
            r"
            SELECT id, author_id, name, image, text, cooking_time, created_at FROM (
                SELECT {RECIPE_COLUMNS},
                       ROW_NUMBER() OVER (PARTITION BY r.author_id ORDER BY r.id DESC) AS position
                FROM recipes r
                WHERE r.author_id IN ({})
            )
            WHERE ? IS NULL OR position <= ?
            ORDER BY author_id, id DESC
            ",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in author_ids {
            query = query.bind(id);
        }
        let rows = query
            .bind(limit)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load author recipes: {e}")))?;

        for row in &rows {
            let recipe = Self::row_to_recipe(row)?;
            by_author.entry(recipe.author_id).or_default().push(recipe);
        }
        Ok(by_author)
    }

    /// Total recipe count of each author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_counts(&self, author_ids: &[i64]) -> AppResult<HashMap<i64, i64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT author_id, COUNT(*) AS total FROM recipes WHERE author_id IN ({}) GROUP BY author_id",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in author_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| (row.get("author_id"), row.get("total")))
            .collect())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        let created_at: String = row.get("created_at");
        Ok(Recipe {
            id: row.get("id"),
            author_id: row.get("author_id"),
            name: row.get("name"),
            image: row.get("image"),
            text: row.get("text"),
            cooking_time: row.get("cooking_time"),
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

async fn insert_recipe_tags(
    tx: &mut Transaction<'static, Sqlite>,
    recipe_id: i64,
    tag_ids: &[i64],
) -> AppResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
    query.push_values(tag_ids, |mut row, tag_id| {
        row.push_bind(recipe_id).push_bind(*tag_id);
    });
    query
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to link recipe tags: {e}")))?;
    Ok(())
}

async fn insert_recipe_ingredients(
    tx: &mut Transaction<'static, Sqlite>,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
) -> AppResult<()> {
    if ingredients.is_empty() {
        return Ok(());
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ",
    );
    query.push_values(ingredients, |mut row, item| {
        row.push_bind(recipe_id)
            .push_bind(item.ingredient_id)
            .push_bind(item.amount);
    });
    query
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to link recipe ingredients: {e}")))?;
    Ok(())
}
