// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, resources, users, tokens and reference data helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram`
//!
//! Every helper builds on an in-memory database and a temporary media root,
//! so tests never touch the working directory.

use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use foodgram::auth::AuthManager;
use foodgram::config::ServerConfig;
use foodgram::database::Database;
use foodgram::models::{Ingredient, NewIngredient, NewTag, NewUser, Tag, User};
use foodgram::resources::ServerResources;
use foodgram::server::build_router;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Smallest byte string the image decoder accepts as a PNG
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// Password used for every test user
pub const TEST_PASSWORD: &str = "Sup3r-secret-pass";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Resources plus the temporary media directory backing them
pub struct TestContext {
    /// Shared server resources
    pub resources: Arc<ServerResources>,
    /// Media root; removed on drop
    pub media_dir: TempDir,
}

impl TestContext {
    /// Fresh router over these resources
    pub fn app(&self) -> Router {
        build_router(&self.resources)
    }

    /// Shortcut to the store
    pub fn database(&self) -> &Database {
        &self.resources.database
    }
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Resources over an in-memory database with cheap password hashing
pub async fn create_test_context() -> Result<TestContext> {
    create_test_context_with(|_| {}).await
}

/// Like [`create_test_context`], with a hook to adjust the configuration
pub async fn create_test_context_with(
    configure: impl FnOnce(&mut ServerConfig),
) -> Result<TestContext> {
    let media_dir = tempfile::tempdir()?;
    let mut config = ServerConfig::default();
    config.media.root = media_dir.path().to_path_buf();
    config.auth.bcrypt_cost = 4;
    configure(&mut config);

    let database = create_test_database().await?;
    let auth_manager = AuthManager::new(b"integration-test-secret", 24, config.auth.bcrypt_cost);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));
    Ok(TestContext {
        resources,
        media_dir,
    })
}

/// Create a user with [`TEST_PASSWORD`] and an active token
pub async fn create_test_user(context: &TestContext, username: &str) -> Result<(User, String)> {
    let resources = &context.resources;
    let password_hash = resources.auth_manager.hash_password(TEST_PASSWORD).await?;
    let user = resources
        .database
        .create_user(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: username.to_owned(),
            password_hash,
        })
        .await?;

    let issued = resources.auth_manager.generate_token(user.id)?;
    resources
        .database
        .store_auth_token(&issued.jti, user.id, issued.issued_at, issued.expires_at)
        .await?;
    Ok((user, issued.token))
}

/// `Authorization` header value for a token
pub fn auth_header(token: &str) -> String {
    format!("Token {token}")
}

/// Insert a tag
pub async fn create_tag(context: &TestContext, name: &str, slug: &str) -> Result<Tag> {
    Ok(context
        .database()
        .create_tag(&NewTag {
            name: name.to_owned(),
            color: "#E26C2D".to_owned(),
            slug: slug.to_owned(),
        })
        .await?)
}

/// Insert an ingredient
pub async fn create_ingredient(context: &TestContext, name: &str, unit: &str) -> Result<Ingredient> {
    Ok(context
        .database()
        .create_ingredient(&NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await?)
}

/// Inline PNG image as sent by the web client
pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG_BYTES))
}

/// JSON body for a valid recipe
pub fn recipe_body(
    name: &str,
    tags: &[i64],
    ingredients: &[(i64, i64)],
    cooking_time: i64,
) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "image": png_data_uri(),
        "text": format!("How to make {name}"),
        "cooking_time": cooking_time,
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| serde_json::json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
    })
}
