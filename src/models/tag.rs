// ABOUTME: Tag model
// ABOUTME: Named, colored label attached to recipes and addressed by slug in filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

/// Recipe tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Hex color (`#RGB` or `#RRGGBB`)
    pub color: String,
    /// Unique slug used by recipe filters
    pub slug: String,
}

/// Tag to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// Hex color
    pub color: String,
    /// Unique slug
    pub slug: String,
}
