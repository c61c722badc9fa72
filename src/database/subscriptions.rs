// ABOUTME: Subscription database operations between followers and recipe authors
// ABOUTME: Subscribe, unsubscribe, paginated followed-author listing and batch is_subscribed lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use chrono::Utc;
use foodgram_core::pagination::PageRequest;

use super::{map_write_error, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::models::User;

impl Database {
    pub(super) async fn migrate_subscriptions(&self) -> AppResult<()> {
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, author_id),
                CHECK (user_id != author_id)
            )
            ",
            "subscriptions table",
        )
        .await?;
        self.execute_schema(
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_author ON subscriptions(author_id)",
            "subscriptions index",
        )
        .await
    }

    /// Subscribe `user_id` to `author_id`
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` for self-subscription or an existing
    /// pair, or a database error
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> AppResult<()> {
        if user_id == author_id {
            return Err(AppError::already_exists("You cannot subscribe to yourself"));
        }

        sqlx::query(
            "INSERT INTO subscriptions (user_id, author_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(author_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "You are already subscribed to this author",
                "Failed to create subscription",
            )
        })?;
        Ok(())
    }

    /// Remove a subscription; returns whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete subscription: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `author_ids` the viewer follows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn subscribed_author_ids(
        &self,
        viewer_id: i64,
        author_ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT author_id FROM subscriptions WHERE user_id = ? AND author_id IN ({})",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(viewer_id);
        for id in author_ids {
            query = query.bind(id);
        }

        let ids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load subscriptions: {e}")))?;
        Ok(ids.into_iter().collect())
    }

    /// Authors followed by `user_id`, ordered by author id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_subscriptions(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.password_hash, u.date_joined
            FROM users u
            JOIN subscriptions s ON s.author_id = u.id
            WHERE s.user_id = $1
            ORDER BY u.id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let authors = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((authors, total))
    }
}
