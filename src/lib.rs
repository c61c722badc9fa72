// ABOUTME: Main library entry point for the Foodgram recipe sharing API
// ABOUTME: Exposes the store, validation, presentation and HTTP layers used by the binaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram
//!
//! A REST API for publishing recipes, following authors, marking favorites
//! and assembling a downloadable shopping list from the recipes in a cart.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` store for users, tokens, tags, ingredients, recipes and memberships
//! - **Validation**: Field-level checks producing `{field: [message]}` error maps
//! - **Representation**: Viewer-aware response shaping (`is_subscribed`, `is_favorited`, ...)
//! - **Routes**: Axum routers per resource, assembled in [`server`]
//! - **Import**: Seed loader for reference ingredients and tags
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use foodgram::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token issuing, validation and password hashing
pub mod auth;

/// Named colors for tag hex codes
pub mod colors;

/// Environment-driven server configuration
pub mod config;

/// `SQLite` persistence for every resource
pub mod database;

/// Recipe list filters
pub mod filters;

/// Seed data import for ingredients and tags
pub mod import;

/// Structured logging setup
pub mod logging;

/// Recipe image decoding and storage
pub mod media;

/// Request authentication, CORS and request tracing
pub mod middleware;

/// Domain models
pub mod models;

/// Response shaping relative to the viewing user
pub mod representation;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly
pub mod server;

/// Shopping list aggregation and rendering
pub mod shopping_list;

/// Input validation
pub mod validation;

/// Unified error types, re-exported from the core crate
pub use foodgram_core::errors;
