// ABOUTME: Seed data readers for reference ingredients and tags
// ABOUTME: Parses CSV or JSON files from a data directory and loads them in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Reference Data Import
//!
//! Reads `ingredients.csv` or `ingredients.json` plus `tags.json` from a data
//! directory. Every row is validated before anything is written, so a bad
//! color or slug aborts the import without touching the store.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use crate::database::{Database, ImportCounts};
use crate::models::{NewIngredient, NewTag};
use crate::validation::{validate_new_ingredient, validate_new_tag};

/// Ingredient seed file name without extension
pub const INGREDIENTS_FILE_STEM: &str = "ingredients";
/// Tag seed file name
pub const TAGS_FILE: &str = "tags.json";

/// Source format of the ingredient seed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IngredientFormat {
    /// `ingredients.csv` with `name,measurement_unit` columns
    #[default]
    Csv,
    /// `ingredients.json`, a list of `{"name", "measurement_unit"}` objects
    Json,
}

impl IngredientFormat {
    /// File extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Where and how to read seed data
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory containing the seed files
    pub data_dir: PathBuf,
    /// Ingredient file format
    pub format: IngredientFormat,
    /// Skip `tags.json`
    pub skip_tags: bool,
    /// Whether the CSV file starts with a header row
    pub has_headers: bool,
}

impl ImportOptions {
    /// Path of the ingredient file for the chosen format
    #[must_use]
    pub fn ingredients_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{INGREDIENTS_FILE_STEM}.{}", self.format.extension()))
    }

    /// Path of the tag file
    #[must_use]
    pub fn tags_path(&self) -> PathBuf {
        self.data_dir.join(TAGS_FILE)
    }
}

/// Parsed and validated seed rows
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Ingredients to insert
    pub ingredients: Vec<NewIngredient>,
    /// Tags to insert
    pub tags: Vec<NewTag>,
}

/// Outcome of an import run
#[derive(Debug, Clone, Copy)]
pub struct ImportReport {
    /// Rows created and skipped
    pub counts: ImportCounts,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Read ingredient rows from CSV
///
/// # Errors
///
/// Returns an error naming the record that failed to parse
pub fn read_ingredients_csv<R: Read>(reader: R, has_headers: bool) -> Result<Vec<NewIngredient>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<NewIngredient>()
        .enumerate()
        .map(|(index, row)| row.with_context(|| format!("Malformed ingredient record #{}", index + 1)))
        .collect()
}

/// Read ingredient rows from a JSON list
///
/// # Errors
///
/// Returns an error if the document is not a list of ingredient objects
pub fn read_ingredients_json<R: Read>(reader: R) -> Result<Vec<NewIngredient>> {
    serde_json::from_reader(reader).context("Malformed ingredients JSON")
}

/// Read tag rows from a JSON list
///
/// # Errors
///
/// Returns an error if the document is not a list of tag objects
pub fn read_tags_json<R: Read>(reader: R) -> Result<Vec<NewTag>> {
    serde_json::from_reader(reader).context("Malformed tags JSON")
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// Read and validate every seed file named by the options
///
/// # Errors
///
/// Returns an error if a file is missing, malformed or holds an invalid row
pub fn load_reference_data(options: &ImportOptions) -> Result<ReferenceData> {
    let ingredients_path = options.ingredients_path();
    let file = open(&ingredients_path)?;
    let raw_ingredients = match options.format {
        IngredientFormat::Csv => read_ingredients_csv(file, options.has_headers),
        IngredientFormat::Json => read_ingredients_json(file),
    }
    .with_context(|| format!("Failed to read {}", ingredients_path.display()))?;

    let ingredients = raw_ingredients
        .iter()
        .enumerate()
        .map(|(index, row)| {
            validate_new_ingredient(row)
                .with_context(|| format!("Invalid ingredient #{} ('{}')", index + 1, row.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let tags = if options.skip_tags {
        Vec::new()
    } else {
        let tags_path = options.tags_path();
        read_tags_json(open(&tags_path)?)
            .with_context(|| format!("Failed to read {}", tags_path.display()))?
            .iter()
            .map(|row| {
                validate_new_tag(row).with_context(|| format!("Invalid tag '{}'", row.slug))
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(ReferenceData { ingredients, tags })
}

/// Load seed files and write them to the store
///
/// # Errors
///
/// Returns an error if reading, validation or the insert transaction fails
pub async fn run_import(database: &Database, options: &ImportOptions) -> Result<ImportReport> {
    let started = Instant::now();
    let data = load_reference_data(options)?;
    info!(
        ingredients = data.ingredients.len(),
        tags = data.tags.len(),
        "Seed files parsed"
    );

    let counts = database
        .import_reference_data(&data.ingredients, &data.tags)
        .await?;

    Ok(ImportReport {
        counts,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_with_and_without_headers() {
        let with_headers = "name,measurement_unit\nflour, g\nmilk,ml\n";
        let rows = read_ingredients_csv(with_headers.as_bytes(), true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].measurement_unit, "g");

        let headerless = "\"salt, coarse\",g\n";
        let rows = read_ingredients_csv(headerless.as_bytes(), false).unwrap();
        assert_eq!(rows[0].name, "salt, coarse");
    }

    #[test]
    fn test_short_csv_record_is_reported() {
        let err = read_ingredients_csv("flour\n".as_bytes(), false).unwrap_err();
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_tags_json() {
        let tags = read_tags_json(
            r##"[{"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"}]"##.as_bytes(),
        )
        .unwrap();
        assert_eq!(tags[0].slug, "breakfast");
        assert!(read_tags_json("{}".as_bytes()).is_err());
    }
}
