// ABOUTME: Shopping cart ingredient query
// ABOUTME: Loads every ingredient amount of the recipes in a user's cart for aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::shopping_list::CartLine;

impl Database {
    /// Ingredient lines of every recipe in the user's cart, ordered by ingredient name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn shopping_cart_lines(&self, user_id: i64) -> AppResult<Vec<CartLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load shopping cart: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| CartLine {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get("amount"),
            })
            .collect())
    }

    /// Whether the user has at least one recipe in the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn has_cart_entries(&self, user_id: i64) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shopping_cart WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check shopping cart: {e}")))
    }
}
