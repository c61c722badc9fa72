// ABOUTME: Query filters for ingredient search and recipe listing
// ABOUTME: Parses filter query parameters and appends matching SQL conditions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Listing filters
//!
//! Recipe filters combine with AND. Several `tags` values match a recipe
//! carrying any of them. The membership flags only narrow the listing for an
//! authenticated viewer and a non-zero value; otherwise they are ignored.

use foodgram_core::pagination::PageQuery;
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// `GET /api/ingredients/` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

impl IngredientSearch {
    /// `LIKE` pattern over the lowercased name column, `\` escaping wildcards
    #[must_use]
    pub fn like_pattern(&self) -> Option<String> {
        let prefix = self.name.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for c in prefix.to_lowercase().chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

/// `GET /api/recipes/` query, including pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    /// One-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
    /// Tag slugs, repeatable
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author id
    pub author: Option<i64>,
    /// Only the viewer's favorites when non-zero
    pub is_favorited: Option<i64>,
    /// Only recipes in the viewer's cart when non-zero
    pub is_in_shopping_cart: Option<i64>,
}

impl RecipeListQuery {
    /// Split into pagination and filter parts
    #[must_use]
    pub fn into_parts(self) -> (PageQuery, RecipeFilter) {
        let page = PageQuery {
            page: self.page,
            limit: self.limit,
        };
        let mut tags: Vec<String> = self
            .tags
            .into_iter()
            .map(|slug| slug.trim().to_owned())
            .filter(|slug| !slug.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        let filter = RecipeFilter {
            tags,
            author: self.author,
            is_favorited: self.is_favorited.is_some_and(|v| v != 0),
            is_in_shopping_cart: self.is_in_shopping_cart.is_some_and(|v| v != 0),
        };
        (page, filter)
    }
}

/// Resolved recipe filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Match any of these tag slugs (empty means no tag filter)
    pub tags: Vec<String>,
    /// Match this author
    pub author: Option<i64>,
    /// Restrict to the viewer's favorites
    pub is_favorited: bool,
    /// Restrict to the viewer's cart
    pub is_in_shopping_cart: bool,
}

impl RecipeFilter {
    /// Append `AND ...` conditions for a query over `recipes r`
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>, viewer: Option<i64>) {
        if !self.tags.is_empty() {
            query.push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug IN (",
            );
            let mut slugs = query.separated(", ");
            for slug in &self.tags {
                slugs.push_bind(slug.clone());
            }
            slugs.push_unseparated("))");
        }

        if let Some(author) = self.author {
            query.push(" AND r.author_id = ").push_bind(author);
        }

        let Some(viewer) = viewer else {
            return;
        };

        if self.is_favorited {
            query
                .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
                .push_bind(viewer)
                .push(")");
        }

        if self.is_in_shopping_cart {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ",
                )
                .push_bind(viewer)
                .push(")");
        }
    }
}
