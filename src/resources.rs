// ABOUTME: Centralized resource container shared by every request handler
// ABOUTME: Holds the store, token manager, auth middleware, media storage and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Server Resources
//!
//! Built once at startup and handed to each router as `Arc<ServerResources>`.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::media::MediaStorage;
use crate::middleware::AuthMiddleware;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Relational store
    pub database: Arc<Database>,
    /// Token signing and password hashing
    pub auth_manager: Arc<AuthManager>,
    /// Header-based request authentication
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Uploaded image storage
    pub media: Arc<MediaStorage>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(auth_manager);
        let auth_middleware = Arc::new(AuthMiddleware::new(
            auth_manager.clone(),
            database.clone(),
        ));
        let media = Arc::new(MediaStorage::new(&config.media));

        Self {
            database,
            auth_manager,
            auth_middleware,
            media,
            config,
        }
    }
}
