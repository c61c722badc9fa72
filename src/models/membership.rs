// ABOUTME: User-to-recipe membership model shared by favorites and shopping carts
// ABOUTME: MembershipKind selects the backing table and the user-facing wording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which list a recipe is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// User's favorite recipes
    Favorite,
    /// Recipes whose ingredients go on the shopping list
    ShoppingCart,
}

impl MembershipKind {
    /// Backing table name
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable list name used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A (user, recipe) pair on one of the lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Which list
    pub kind: MembershipKind,
    /// Owning user
    pub user_id: i64,
    /// Listed recipe
    pub recipe_id: i64,
    /// When the recipe was added
    pub created_at: DateTime<Utc>,
}
