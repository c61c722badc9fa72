// ABOUTME: Favorite and shopping-cart membership database operations
// ABOUTME: One implementation parameterized by MembershipKind over two identically shaped tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use chrono::Utc;

use super::{map_write_error, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Membership, MembershipKind};

impl Database {
    pub(super) async fn migrate_memberships(&self) -> AppResult<()> {
        for kind in [MembershipKind::Favorite, MembershipKind::ShoppingCart] {
            let table = kind.table();
            self.execute_schema(
                &format!(
                    r"
                    CREATE TABLE IF NOT EXISTS {table} (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                        created_at TEXT NOT NULL,
                        UNIQUE (user_id, recipe_id)
                    )
                    "
                ),
                table,
            )
            .await?;
            self.execute_schema(
                &format!("CREATE INDEX IF NOT EXISTS idx_{table}_recipe ON {table}(recipe_id)"),
                table,
            )
            .await?;
        }
        Ok(())
    }

    /// Put a recipe on one of the user's lists
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when the recipe is already listed,
    /// or a database error
    pub async fn add_membership(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<Membership> {
        let created_at = Utc::now();
        sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!("Recipe is already in {}", kind.label()),
                &format!("Failed to add recipe to {kind}"),
            )
        })?;

        Ok(Membership {
            kind,
            user_id,
            recipe_id,
            created_at,
        })
    }

    /// Take a recipe off one of the user's lists; returns whether it was listed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn remove_membership(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove recipe from {kind}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `recipe_ids` are on the user's list
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn listed_recipe_ids(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT recipe_id FROM {} WHERE user_id = ? AND recipe_id IN ({})",
            kind.table(),
            placeholders(recipe_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id);
        for id in recipe_ids {
            query = query.bind(id);
        }

        let ids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load {kind}: {e}")))?;
        Ok(ids.into_iter().collect())
    }
}
