// ABOUTME: Shopping list aggregation and plain-text rendering
// ABOUTME: Sums cart ingredient amounts per (name, unit) and formats the downloadable document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::BTreeMap;
use std::fmt::Write as _;

use foodgram_core::constants::shopping_list::{FILENAME_SUFFIX, FOOTER};

/// One ingredient line of one recipe in the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Amount required by that recipe
    pub amount: i64,
}

/// Summed amount of one distinct (name, unit) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Total over every recipe in the cart
    pub total_amount: i64,
}

/// Group lines by (name, unit) and sum the amounts, ordered by name then unit
#[must_use]
pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Vec<ShoppingListItem> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += line.amount;
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Render the downloadable document
#[must_use]
pub fn render(username: &str, items: &[ShoppingListItem]) -> String {
    let mut document = format!("Shopping list for {username}:\n\n");
    for (idx, item) in items.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = writeln!(
            document,
            "{}. {} ({}) \u{2014} {}",
            idx + 1,
            capitalize(&item.name),
            item.measurement_unit,
            item.total_amount
        );
    }
    document.push('\n');
    document.push_str(FOOTER);
    document
}

/// Attachment file name for a user's list
#[must_use]
pub fn filename(username: &str) -> String {
    format!("{username}{FILENAME_SUFFIX}")
}

/// First character upper-cased, the rest lower-cased
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
