// ABOUTME: Issued authentication token registry
// ABOUTME: Records token ids at login so logout can revoke them before expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};

use super::Database;
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_tokens(&self) -> AppResult<()> {
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS auth_tokens (
                jti TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                issued_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            ",
            "auth_tokens table",
        )
        .await?;
        self.execute_schema(
            "CREATE INDEX IF NOT EXISTS idx_auth_tokens_user ON auth_tokens(user_id)",
            "auth_tokens index",
        )
        .await
    }

    /// Record a freshly issued token
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn store_auth_token(
        &self,
        jti: &str,
        user_id: i64,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO auth_tokens (jti, user_id, issued_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(jti)
        .bind(user_id)
        .bind(issued_at.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store auth token: {e}")))?;
        Ok(())
    }

    /// Whether a token id is still active for the given user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_auth_token_active(&self, jti: &str, user_id: i64) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth_tokens WHERE jti = $1 AND user_id = $2)")
            .bind(jti)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check auth token: {e}")))
    }

    /// Revoke a token; returns whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn revoke_auth_token(&self, jti: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE jti = $1")
            .bind(jti)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to revoke auth token: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop tokens whose expiry has passed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at < $1")
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to purge auth tokens: {e}")))?;
        Ok(result.rows_affected())
    }
}
