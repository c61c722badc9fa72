// ABOUTME: Foodgram API server binary
// ABOUTME: Loads configuration, opens the database and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Foodgram API Server Binary
//!
//! Starts the recipe API with token authentication, the SQLite store and
//! local media storage. Configuration comes from the environment (and an
//! optional `.env` file); a few values can be overridden on the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram::auth::AuthManager;
use foodgram::config::{DatabaseUrl, ServerConfig};
use foodgram::database::Database;
use foodgram::logging;
use foodgram::resources::ServerResources;
use foodgram::server::FoodgramServer;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram API - share recipes, follow authors and build shopping lists")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Override media root directory
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url);
    }
    if let Some(root) = args.media_root {
        config.media.root = root;
    }
    config.validate()?;

    logging::init_from_env()?;
    info!("Starting Foodgram API");
    info!("{}", config.summary());

    tokio::fs::create_dir_all(&config.media.root).await?;
    if let DatabaseUrl::SQLite { path } = &config.database.url {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!(
        "Database URL: {}",
        config.database.url.to_connection_string()
    );

    let auth_manager = AuthManager::from_config(&config.auth);
    info!("Authentication manager initialized");

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    if let Err(e) = FoodgramServer::new(resources).run(port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
