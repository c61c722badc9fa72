// ABOUTME: User account database operations
// ABOUTME: Registration, lookup by id or email, paginated listing and password updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::Utc;
use foodgram_core::pagination::PageRequest;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{map_write_error, parse_timestamp, placeholders, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, date_joined";

impl Database {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_schema(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE CHECK (length(email) <= 254),
                username TEXT NOT NULL UNIQUE CHECK (length(username) <= 150),
                first_name TEXT NOT NULL CHECK (length(first_name) <= 150),
                last_name TEXT NOT NULL CHECK (length(last_name) <= 150),
                password_hash TEXT NOT NULL,
                date_joined TEXT NOT NULL
            )
            ",
            "users table",
        )
        .await
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when the email or username is taken,
    /// or a database error
    pub async fn create_user(&self, new_user: &NewUser) -> AppResult<User> {
        let date_joined = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(date_joined.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "A user with this email or username already exists",
                "Failed to create user",
            )
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            password_hash: new_user.password_hash.clone(),
            date_joined,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by email address (the login identifier)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Load the listed users keyed by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn users_by_ids(&self, user_ids: &[i64]) -> AppResult<HashMap<i64, User>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN ({})",
            placeholders(user_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in user_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load users: {e}")))?;

        rows.iter()
            .map(|row| Self::row_to_user(row).map(|user| (user.id, user)))
            .collect()
    }

    /// Report which of email and username are already registered
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn user_conflicts(&self, email: &str, username: &str) -> AppResult<(bool, bool)> {
        let row = sqlx::query(
            r"
            SELECT
                EXISTS(SELECT 1 FROM users WHERE email = $1) AS email_taken,
                EXISTS(SELECT 1 FROM users WHERE username = $2) AS username_taken
            ",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check user uniqueness: {e}")))?;

        Ok((row.get("email_taken"), row.get("username_taken")))
    }

    /// List users ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self, page: PageRequest) -> AppResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns not-found if the user does not exist, or a database error
    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Delete a user; recipes, tokens, memberships and subscriptions cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_user(&self, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let date_joined: String = row.get("date_joined");
        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            date_joined: parse_timestamp(&date_joined)?,
        })
    }
}
