// ABOUTME: Application constants grouped by domain
// ABOUTME: Field lengths, numeric bounds, pagination defaults and endpoint paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Constants module
//!
//! Pure data constants. Values that operators may tune (bounds, page size)
//! only provide defaults here; the server reads overrides from the environment.

/// Maximum lengths of stored text fields
pub mod lengths {
    /// Tag, ingredient and recipe names, measurement units and slugs
    pub const NAME_MAX_LENGTH: usize = 256;
    /// Hex color including the leading `#`
    pub const COLOR_MAX_LENGTH: usize = 7;
    /// Username, first and last name
    pub const USER_FIELD_MAX_LENGTH: usize = 150;
    /// Email address
    pub const EMAIL_MAX_LENGTH: usize = 254;
    /// Minimum password length
    pub const PASSWORD_MIN_LENGTH: usize = 8;
    /// Upper bound on accepted password length (bcrypt ignores bytes past 72)
    pub const PASSWORD_MAX_LENGTH: usize = 128;
}

/// Numeric bounds for recipe fields
pub mod limits {
    /// Smallest accepted cooking time and ingredient amount
    pub const MIN_VALIDATION_VALUE: i64 = 1;
    /// Default largest cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_000;
    /// Default largest ingredient amount
    pub const MAX_AMOUNT: i64 = 32_000;
    /// Largest value the store columns accept
    pub const STORAGE_MAX_VALUE: i64 = 32_767;
}

/// Pagination defaults
pub mod pagination {
    /// Default page size
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Largest page size a client may request through `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
    /// Query parameter holding the page number
    pub const PAGE_QUERY_PARAM: &str = "page";
}

/// User-related constants
pub mod users {
    /// Username reserved for the current-user endpoint
    pub const RESERVED_USERNAME: &str = "me";
    /// Allowed username pattern
    pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";
}

/// Tag-related constants
pub mod tags {
    /// Allowed hex color pattern (`#RGB` or `#RRGGBB`)
    pub const COLOR_PATTERN: &str = r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$";
    /// Allowed slug pattern
    pub const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";
}

/// Media storage constants
pub mod media {
    /// Directory below the media root that holds recipe images
    pub const RECIPE_IMAGE_DIR: &str = "recipes/images";
    /// Image subtypes accepted in data URIs and multipart uploads
    pub const ALLOWED_IMAGE_SUBTYPES: &[&str] = &["png", "jpeg", "jpg", "gif", "webp", "bmp"];
    /// Default upload size limit (10 MiB)
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
}

/// Shopping list document
pub mod shopping_list {
    /// Footer lines appended to every downloaded list
    pub const FOOTER: &str = "Foodgram\nHappy cooking!";
    /// Suffix of the attachment file name
    pub const FILENAME_SUFFIX: &str = "_shopping_list.txt";
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
}

/// Service identity used in logs and token audiences
pub mod service_names {
    /// HTTP API server
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
    /// JWT audience
    pub const API_AUDIENCE: &str = "foodgram-api";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}
