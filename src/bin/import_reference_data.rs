// ABOUTME: Reference data import utility for ingredients and tags
// ABOUTME: Loads seed CSV or JSON files into the recipe database in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Reference data importer for Foodgram.
//!
//! Usage:
//! ```bash
//! # Import data/ingredients.csv and data/tags.json
//! cargo run --bin import-reference-data
//!
//! # JSON ingredients from another directory, without tags
//! cargo run --bin import-reference-data -- --data-dir ./seed --format json --skip-tags
//!
//! # Headerless CSV, verbose output
//! cargo run --bin import-reference-data -- --no-headers -v
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use foodgram::database::Database;
use foodgram::import::{run_import, ImportOptions, IngredientFormat};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "import-reference-data",
    about = "Foodgram reference data importer",
    long_about = "Load seed ingredients and tags from CSV or JSON files"
)]
struct ImportArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding the seed files
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Ingredient file format
    #[arg(long, value_enum, default_value_t = IngredientFormat::Csv)]
    format: IngredientFormat,

    /// Do not import tags.json
    #[arg(long)]
    skip_tags: bool,

    /// The CSV file has no header row
    #[arg(long)]
    no_headers: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ImportArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Foodgram Reference Data Importer ===");

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/foodgram.db".into());
    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url).await?;

    let options = ImportOptions {
        data_dir: args.data_dir,
        format: args.format,
        skip_tags: args.skip_tags,
        has_headers: !args.no_headers,
    };
    info!("Reading {}", options.ingredients_path().display());

    let report = run_import(&database, &options).await?;
    let seconds = report.elapsed.as_secs();

    info!("");
    info!("=== Import Complete ===");
    info!(
        "Ingredients: {} created, {} already present",
        report.counts.ingredients_created, report.counts.ingredients_skipped
    );
    if !options.skip_tags {
        info!(
            "Tags: {} created, {} already present",
            report.counts.tags_created, report.counts.tags_skipped
        );
    }
    info!("Finished in {} min {} s", seconds / 60, seconds % 60);

    Ok(())
}
