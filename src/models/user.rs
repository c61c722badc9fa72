// ABOUTME: User account model
// ABOUTME: Stored user record and the input used to register a new account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user; `email` is the login identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub date_joined: DateTime<Utc>,
}

/// Validated registration input with an already hashed password
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
}
