// ABOUTME: Domain data models for users, tags, ingredients, recipes and memberships
// ABOUTME: Plain records loaded from the store and the validated inputs written to it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Data Models
//!
//! Records mirror the relational schema one-to-one. Shared field groups are
//! composed rather than inherited: favorites and shopping-cart entries are one
//! [`Membership`] shape told apart by [`MembershipKind`].

mod ingredient;
mod membership;
mod recipe;
mod tag;
mod user;

pub use ingredient::{Ingredient, IngredientAmount, NewIngredient, RecipeIngredient};
pub use membership::{Membership, MembershipKind};
pub use recipe::{NewRecipe, Recipe, RecipeChanges};
pub use tag::{NewTag, Tag};
pub use user::{NewUser, User};
