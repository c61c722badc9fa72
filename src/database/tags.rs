// ABOUTME: Tag database operations
// ABOUTME: Tag creation, lookup, ordered listing and batch loading of recipe tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::{HashMap, HashSet};

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{map_write_error, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewTag, Tag};

impl Database {
    pub(super) async fn migrate_tags(&self) -> AppResult<()> {
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) <= 256),
                color TEXT NOT NULL CHECK (length(color) <= 7),
                slug TEXT NOT NULL UNIQUE CHECK (length(slug) <= 256)
            )
            ",
            "tags table",
        )
        .await
    }

    /// Insert a tag
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when the slug is taken, or a database error
    pub async fn create_tag(&self, tag: &NewTag) -> AppResult<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
            .bind(&tag.name)
            .bind(&tag.color)
            .bind(&tag.slug)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "A tag with this slug already exists", "Failed to create tag")
            })?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        })
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_tag(&self, tag_id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_tag))
    }

    /// All tags ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, color, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        Ok(rows.iter().map(Self::row_to_tag).collect())
    }

    /// Which of the given ids exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_tag_ids(&self, tag_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if tag_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT id FROM tags WHERE id IN ({})",
            placeholders(tag_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in tag_ids {
            query = query.bind(id);
        }

        let ids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check tags: {e}")))?;
        Ok(ids.into_iter().collect())
    }

    /// Tags of each listed recipe, each set ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn tags_for_recipes(&self, recipe_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Tag>>> {
        let mut by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(by_recipe);
        }

        let sql = format!(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN ({})
            ORDER BY t.name, t.id
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
            .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(Self::row_to_tag(row));
        }
        Ok(by_recipe)
    }

    fn row_to_tag(row: &SqliteRow) -> Tag {
        Tag {
            id: row.get("id"),
            name: row.get("name"),
            color: row.get("color"),
            slug: row.get("slug"),
        }
    }
}
