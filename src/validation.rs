// ABOUTME: Incoming payload types and their field-level validation
// ABOUTME: Turns registration, password and recipe payloads into checked records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Payload validation
//!
//! Every validator collects all problems into [`ValidationErrors`] before
//! failing, so a client sees each offending field in a single 400 response.
//! Checks that need the store (unknown references, taken email or username)
//! run after the local checks.

use std::collections::HashSet;
use std::sync::LazyLock;

use foodgram_core::constants::lengths::{
    EMAIL_MAX_LENGTH, NAME_MAX_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    USER_FIELD_MAX_LENGTH,
};
use foodgram_core::constants::limits::MIN_VALIDATION_VALUE;
use foodgram_core::constants::tags::SLUG_PATTERN;
use foodgram_core::constants::users::{RESERVED_USERNAME, USERNAME_PATTERN};
use regex::Regex;
use serde::Deserialize;

use crate::colors;
use crate::config::ApiConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::media::DecodedImage;
use crate::models::{IngredientAmount, NewIngredient, NewTag};

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

static USERNAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(USERNAME_PATTERN).ok());
static SLUG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(SLUG_PATTERN).ok());
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// Record an error for a missing or blank text field, returning the trimmed value
fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max_length: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if value.chars().count() > max_length {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        );
        return None;
    }
    Some(value.to_owned())
}

fn check_bounds(errors: &mut ValidationErrors, field: &str, value: i64, max: i64) -> bool {
    if value < MIN_VALIDATION_VALUE {
        errors.add(
            field,
            format!("Ensure this value is greater than or equal to {MIN_VALIDATION_VALUE}."),
        );
        false
    } else if value > max {
        errors.add(
            field,
            format!("Ensure this value is less than or equal to {max}."),
        );
        false
    } else {
        true
    }
}

// ============================================================================
// Users
// ============================================================================

/// `POST /api/users/` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserPayload {
    /// Login email
    pub email: Option<String>,
    /// Public handle
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Registration that passed validation; the password is still plain text
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    /// Login email
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain-text password to hash
    pub password: String,
}

impl RegisterUserPayload {
    /// Validate fields, password strength and uniqueness of email and username
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every bad field, or a database error
    pub async fn validate(self, database: &Database) -> AppResult<ValidatedRegistration> {
        let mut errors = ValidationErrors::new();

        let email = required_text(&mut errors, "email", self.email.as_deref(), EMAIL_MAX_LENGTH);
        if let Some(email) = &email {
            if !matches(&EMAIL, email) {
                errors.add("email", "Enter a valid email address.");
            }
        }

        let username = required_text(
            &mut errors,
            "username",
            self.username.as_deref(),
            USER_FIELD_MAX_LENGTH,
        );
        if let Some(username) = &username {
            validate_username(&mut errors, username);
        }

        let first_name = required_text(
            &mut errors,
            "first_name",
            self.first_name.as_deref(),
            USER_FIELD_MAX_LENGTH,
        );
        let last_name = required_text(
            &mut errors,
            "last_name",
            self.last_name.as_deref(),
            USER_FIELD_MAX_LENGTH,
        );

        let password = match self.password {
            None => {
                errors.add("password", REQUIRED);
                None
            }
            Some(password) => {
                validate_password(
                    &mut errors,
                    "password",
                    &password,
                    username.as_deref(),
                    email.as_deref(),
                );
                Some(password)
            }
        };

        if let (Some(email), Some(username)) = (&email, &username) {
            let (email_taken, username_taken) = database.user_conflicts(email, username).await?;
            if email_taken {
                errors.add("email", "A user with that email already exists.");
            }
            if username_taken {
                errors.add("username", "A user with that username already exists.");
            }
        }

        errors.into_result()?;
        let (Some(email), Some(username), Some(first_name), Some(last_name), Some(password)) =
            (email, username, first_name, last_name, password)
        else {
            return Err(AppError::internal("Incomplete registration passed validation"));
        };
        Ok(ValidatedRegistration {
            email,
            username,
            first_name,
            last_name,
            password,
        })
    }
}

/// Pattern and reserved-name checks for a username
pub fn validate_username(errors: &mut ValidationErrors, username: &str) {
    if !matches(&USERNAME, username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        errors.add(
            "username",
            format!("Username '{username}' is reserved and cannot be used."),
        );
    }
}

/// Password strength rules
pub fn validate_password(
    errors: &mut ValidationErrors,
    field: &str,
    password: &str,
    username: Option<&str>,
    email: Option<&str>,
) {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        errors.add(
            field,
            format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
            ),
        );
    }
    if length > PASSWORD_MAX_LENGTH {
        errors.add(
            field,
            format!("Ensure this field has no more than {PASSWORD_MAX_LENGTH} characters."),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }

    let lowered = password.to_lowercase();
    let email_local = email.and_then(|e| e.split('@').next());
    for (attribute, value) in [
        ("username", username),
        ("email address", email),
        ("email address", email_local),
    ] {
        if value.is_some_and(|v| !v.is_empty() && v.to_lowercase() == lowered) {
            errors.add(field, format!("The password is too similar to the {attribute}."));
            break;
        }
    }
}

/// `POST /api/users/set_password/` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetPasswordPayload {
    /// Password currently on file
    pub current_password: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// `POST /api/auth/token/login/` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    /// Login email
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

impl LoginPayload {
    /// Both credentials, or a validation error naming the missing ones
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field is missing or blank
    pub fn credentials(self) -> AppResult<(String, String)> {
        let mut errors = ValidationErrors::new();
        let email = required_text(&mut errors, "email", self.email.as_deref(), EMAIL_MAX_LENGTH);
        let password = self.password.filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add("password", REQUIRED);
        }
        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::validation(errors)),
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// One `{id, amount}` entry of a recipe's ingredient list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmountPayload {
    /// Ingredient id
    pub id: i64,
    /// Quantity
    pub amount: i64,
}

/// Recipe image as it arrived on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Inline `data:image/...;base64,...` value
    DataUri(String),
    /// Multipart file part
    Upload {
        /// Declared content type of the part
        content_type: Option<String>,
        /// File bytes
        bytes: Vec<u8>,
    },
}

/// JSON body of recipe create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipePayload {
    /// Title
    pub name: Option<String>,
    /// Inline image
    pub image: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Ingredient amounts
    pub ingredients: Option<Vec<IngredientAmountPayload>>,
}

/// Recipe write input from either a JSON or a multipart body
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    /// Title
    pub name: Option<String>,
    /// Image
    pub image: Option<ImageInput>,
    /// Description
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Ingredient amounts
    pub ingredients: Option<Vec<IngredientAmountPayload>>,
}

impl From<RecipePayload> for RecipeInput {
    fn from(payload: RecipePayload) -> Self {
        Self {
            name: payload.name,
            image: payload.image.map(ImageInput::DataUri),
            text: payload.text,
            cooking_time: payload.cooking_time,
            tags: payload.tags,
            ingredients: payload.ingredients,
        }
    }
}

/// Whether scalar fields are mandatory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every field is required
    Create,
    /// Scalars are optional; tags and ingredients still replace the sets
    Update,
}

/// Recipe input that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedRecipe {
    /// Title
    pub name: Option<String>,
    /// Decoded image, ready to store
    pub image: Option<DecodedImage>,
    /// Description
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Distinct tag ids
    pub tags: Vec<i64>,
    /// Distinct ingredient amounts
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeInput {
    /// Validate fields, bounds and references
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every bad field, or a database error
    pub async fn validate(
        self,
        database: &Database,
        limits: &ApiConfig,
        mode: WriteMode,
    ) -> AppResult<ValidatedRecipe> {
        let mut errors = ValidationErrors::new();
        let creating = mode == WriteMode::Create;

        let name = match self.name.as_deref() {
            None if !creating => None,
            value => required_text(&mut errors, "name", value, NAME_MAX_LENGTH),
        };
        let text = match self.text.as_deref() {
            None if !creating => None,
            Some(value) if !value.trim().is_empty() => Some(value.to_owned()),
            Some(_) => {
                errors.add("text", BLANK);
                None
            }
            None => {
                errors.add("text", REQUIRED);
                None
            }
        };

        let cooking_time = match self.cooking_time {
            Some(value) => check_bounds(&mut errors, "cooking_time", value, limits.max_cooking_time)
                .then_some(value),
            None => {
                if creating {
                    errors.add("cooking_time", REQUIRED);
                }
                None
            }
        };

        let image = match self.image {
            Some(input) => match decode_image(input) {
                Ok(image) => Some(image),
                Err(message) => {
                    errors.add("image", message);
                    None
                }
            },
            None => {
                if creating {
                    errors.add("image", REQUIRED);
                }
                None
            }
        };

        let tags = check_tags(&mut errors, self.tags);
        let ingredients = check_ingredients(&mut errors, self.ingredients, limits.max_amount);

        if !tags.is_empty() {
            let known = database.existing_tag_ids(&tags).await?;
            if let Some(missing) = tags.iter().find(|id| !known.contains(id)) {
                errors.add("tags", format!("Invalid pk \"{missing}\" - object does not exist."));
            }
        }
        if !ingredients.is_empty() {
            let ids: Vec<i64> = ingredients.iter().map(|i| i.ingredient_id).collect();
            let known = database.existing_ingredient_ids(&ids).await?;
            if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
                errors.add(
                    "ingredients",
                    format!("Ingredient with id {missing} does not exist."),
                );
            }
        }

        errors.into_result()?;
        Ok(ValidatedRecipe {
            name,
            image,
            text,
            cooking_time,
            tags,
            ingredients,
        })
    }
}

fn decode_image(input: ImageInput) -> Result<DecodedImage, String> {
    let decoded = match input {
        ImageInput::DataUri(value) => DecodedImage::from_data_uri(&value),
        ImageInput::Upload {
            content_type,
            bytes,
        } => DecodedImage::from_upload(content_type.as_deref(), bytes),
    };
    decoded.map_err(|e| e.to_string())
}

fn check_tags(errors: &mut ValidationErrors, tags: Option<Vec<i64>>) -> Vec<i64> {
    let Some(tags) = tags else {
        errors.add("tags", "Tags must be provided.");
        return Vec::new();
    };
    if tags.is_empty() {
        errors.add("tags", "Tags must not be empty.");
        return Vec::new();
    }
    let mut seen = HashSet::new();
    if !tags.iter().all(|id| seen.insert(*id)) {
        errors.add("tags", "Tags must not repeat.");
        return Vec::new();
    }
    tags
}

fn check_ingredients(
    errors: &mut ValidationErrors,
    ingredients: Option<Vec<IngredientAmountPayload>>,
    max_amount: i64,
) -> Vec<IngredientAmount> {
    let Some(ingredients) = ingredients else {
        errors.add("ingredients", "Ingredients must be provided.");
        return Vec::new();
    };
    if ingredients.is_empty() {
        errors.add("ingredients", "Ingredients must not be empty.");
        return Vec::new();
    }
    let mut seen = HashSet::new();
    if !ingredients.iter().all(|item| seen.insert(item.id)) {
        errors.add("ingredients", "Ingredients must not repeat.");
        return Vec::new();
    }
    let in_bounds = ingredients
        .iter()
        .all(|item| check_bounds(errors, "ingredients", item.amount, max_amount));
    if !in_bounds {
        return Vec::new();
    }
    ingredients
        .into_iter()
        .map(|item| IngredientAmount {
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect()
}

// ============================================================================
// Reference data
// ============================================================================

/// Check a seed ingredient, returning it trimmed
///
/// # Errors
///
/// Returns a validation error for blank or overlong fields
pub fn validate_new_ingredient(ingredient: &NewIngredient) -> AppResult<NewIngredient> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", Some(&ingredient.name), NAME_MAX_LENGTH);
    let unit = required_text(
        &mut errors,
        "measurement_unit",
        Some(&ingredient.measurement_unit),
        NAME_MAX_LENGTH,
    );
    errors.into_result()?;
    Ok(NewIngredient {
        name: name.unwrap_or_default(),
        measurement_unit: unit.unwrap_or_default(),
    })
}

/// Check a seed tag's name, color and slug, returning it trimmed
///
/// # Errors
///
/// Returns a validation error for a malformed color or slug
pub fn validate_new_tag(tag: &NewTag) -> AppResult<NewTag> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", Some(&tag.name), NAME_MAX_LENGTH);

    let color = tag.color.trim();
    if !colors::is_valid_hex(color) {
        errors.add("color", format!("'{color}' is not a hex color like #E26C2D."));
    }

    let slug = required_text(&mut errors, "slug", Some(&tag.slug), NAME_MAX_LENGTH);
    if let Some(slug) = &slug {
        if !matches(&SLUG, slug) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }
    }

    errors.into_result()?;
    Ok(NewTag {
        name: name.unwrap_or_default(),
        color: color.to_owned(),
        slug: slug.unwrap_or_default(),
    })
}
