// ABOUTME: HTTP server assembly for the Foodgram API
// ABOUTME: Merges domain routers, applies the tower middleware stack and runs with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Server
//!
//! Builds the axum application from the per-domain routers and serves it.
//! Uploaded media is served back from the configured media URL prefix.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::middleware::{create_request_span, setup_cors, MakeRequestUuid, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::{
    AuthRoutes, HealthRoutes, IngredientRoutes, RecipeRoutes, TagRoutes, UserRoutes,
};

/// Foodgram HTTP server
pub struct FoodgramServer {
    resources: Arc<ServerResources>,
}

impl FoodgramServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Complete application router with middleware applied
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(&self.resources)
    }

    /// Bind and serve until SIGINT or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails
    pub async fn run(self, port: u16) -> Result<()> {
        let address = format!("{}:{port}", self.resources.config.host);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;

        info!("Foodgram API listening on http://{address}");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;
        info!("Server shut down cleanly");
        Ok(())
    }
}

/// Assemble every route group and the shared middleware stack
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let config = &resources.config;
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let mut app = Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources.clone()))
        .merge(TagRoutes::routes(resources.clone()))
        .merge(IngredientRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()));

    let media_prefix = config.media.url.trim_end_matches('/');
    if media_prefix.starts_with('/') && media_prefix.len() > 1 {
        app = app.nest_service(media_prefix, ServeDir::new(resources.media.root()));
    } else {
        warn!(
            "Media URL '{}' is not a local path prefix; uploaded images will not be served",
            config.media.url
        );
    }

    app.fallback(|| async { AppError::not_found("Endpoint") })
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(setup_cors(&config.security))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.security.request_timeout_secs,
                ))),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
