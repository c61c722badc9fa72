// ABOUTME: Bulk loading of reference ingredients and tags
// ABOUTME: Inserts seed rows in a single transaction, skipping rows that already exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewIngredient, NewTag};

/// Rows written and skipped by a seed import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    /// Ingredients inserted
    pub ingredients_created: u64,
    /// Ingredients already present (same name and unit)
    pub ingredients_skipped: u64,
    /// Tags inserted
    pub tags_created: u64,
    /// Tags whose slug already existed
    pub tags_skipped: u64,
}

impl Database {
    /// Insert seed ingredients and tags atomically
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then
    pub async fn import_reference_data(
        &self,
        ingredients: &[NewIngredient],
        tags: &[NewTag],
    ) -> AppResult<ImportCounts> {
        let mut counts = ImportCounts::default();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin import: {e}")))?;

        for ingredient in ingredients {
            let result = sqlx::query(
                r"
                INSERT INTO ingredients (name, name_lower, measurement_unit)
                VALUES ($1, $2, $3)
                ON CONFLICT (name, measurement_unit) DO NOTHING
                ",
            )
            .bind(&ingredient.name)
            .bind(ingredient.name.to_lowercase())
            .bind(&ingredient.measurement_unit)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to import ingredient '{}': {e}",
                    ingredient.name
                ))
            })?;

            if result.rows_affected() > 0 {
                counts.ingredients_created += 1;
            } else {
                counts.ingredients_skipped += 1;
            }
        }

        for tag in tags {
            let result = sqlx::query(
                r"
                INSERT INTO tags (name, color, slug)
                VALUES ($1, $2, $3)
                ON CONFLICT (slug) DO NOTHING
                ",
            )
            .bind(&tag.name)
            .bind(&tag.color)
            .bind(&tag.slug)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to import tag '{}': {e}", tag.slug)))?;

            if result.rows_affected() > 0 {
                counts.tags_created += 1;
            } else {
                counts.tags_skipped += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit import: {e}")))?;
        Ok(counts)
    }
}
