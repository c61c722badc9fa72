// ABOUTME: Database management for the relational store behind the API
// ABOUTME: Opens the SQLite pool, runs idempotent migrations and hosts shared row helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Database Management
//!
//! [`Database`] wraps a `SqlitePool`. Each entity area adds its queries in its
//! own submodule through `impl Database` blocks, and contributes a
//! `migrate_*` step that creates its tables with `CREATE TABLE IF NOT EXISTS`.

mod ingredients;
mod memberships;
mod recipes;
mod reference_data;
mod shopping_list;
mod subscriptions;
mod tags;
mod tokens;
mod users;

pub use reference_data::ImportCounts;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Maximum pooled connections for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

/// Database manager for every table of the service
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a connection pool and run migrations
    ///
    /// The file is created when missing and foreign keys are enforced on
    /// every connection. In-memory databases use a single long-lived
    /// connection so all queries see the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or a
    /// migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let is_memory = database_url.contains(":memory:");
        let pool_options = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(Duration::from_secs(10))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database.memory = is_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_tokens().await?;
        self.migrate_subscriptions().await?;
        self.migrate_tags().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_memberships().await?;
        Ok(())
    }

    /// Execute one schema statement
    async fn execute_schema(&self, statement: &str, what: &str) -> AppResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create {what}: {e}")))?;
        Ok(())
    }
}

/// Map a write failure, turning a uniqueness violation into a client error
pub(crate) fn map_write_error(error: sqlx::Error, conflict: &str, context: &str) -> AppError {
    let unique = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());
    if unique {
        AppError::already_exists(conflict)
    } else {
        AppError::database(format!("{context}: {error}"))
    }
}

/// Parse a stored RFC 3339 timestamp
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid date: {e}")))
}

/// `?, ?, ?` placeholder list for an `IN (...)` clause
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
