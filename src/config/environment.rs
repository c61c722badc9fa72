// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server, store, auth, media and API settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Environment-based configuration management

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use foodgram_core::constants::{limits, media, pagination, ports};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path of the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; anything without the `sqlite:` scheme is treated as a file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"));
        match path_str.unwrap_or(s) {
            ":memory:" => Self::Memory,
            path => Self::SQLite {
                path: PathBuf::from(path),
            },
        }
    }

    /// Convert to a connection string accepted by `sqlx`
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/foodgram.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Media storage configuration
    pub media: MediaConfig,
    /// API behavior (pagination, value bounds)
    pub api: ApiConfig,
    /// Transport security and limits
    pub security: SecurityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            http_port: ports::DEFAULT_HTTP_PORT,
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
            api: ApiConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing; a random one is generated when absent
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiry_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Media storage configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory that holds uploaded files
    pub root: PathBuf,
    /// URL prefix under which `root` is served
    pub url: String,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./media"),
            url: "/media/".to_owned(),
            max_upload_bytes: media::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// API behavior configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// Default page size
    pub page_size: u32,
    /// Largest page size a client may request
    pub max_page_size: u32,
    /// Upper bound on recipe cooking time
    pub max_cooking_time: i64,
    /// Upper bound on ingredient amount
    pub max_amount: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: pagination::DEFAULT_PAGE_SIZE,
            max_page_size: pagination::MAX_PAGE_SIZE,
            max_cooking_time: limits::MAX_COOKING_TIME,
            max_amount: limits::MAX_AMOUNT,
        }
    }
}

/// Transport security configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins (`*` allows any)
    pub cors_allowed_origins: Vec<String>,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["*".to_owned()],
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value or the
    /// resulting configuration fails [`Self::validate`]
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            host: env_var_or("HOST", "0.0.0.0"),
            http_port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),

            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    "DATABASE_URL",
                    "sqlite:./data/foodgram.db",
                )),
            },

            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
                jwt_expiry_hours: env_var_or("JWT_EXPIRY_HOURS", "24")
                    .parse()
                    .context("Invalid JWT_EXPIRY_HOURS value")?,
                bcrypt_cost: env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
            },

            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", "./media")),
                url: env_var_or("MEDIA_URL", "/media/"),
                max_upload_bytes: env_var_or(
                    "MAX_UPLOAD_BYTES",
                    &media::DEFAULT_MAX_UPLOAD_BYTES.to_string(),
                )
                .parse()
                .context("Invalid MAX_UPLOAD_BYTES value")?,
            },

            api: ApiConfig {
                page_size: env_var_or("PAGE_SIZE", &pagination::DEFAULT_PAGE_SIZE.to_string())
                    .parse()
                    .context("Invalid PAGE_SIZE value")?,
                max_page_size: pagination::MAX_PAGE_SIZE,
                max_cooking_time: env_var_or(
                    "MAX_COOKING_TIME",
                    &limits::MAX_COOKING_TIME.to_string(),
                )
                .parse()
                .context("Invalid MAX_COOKING_TIME value")?,
                max_amount: env_var_or("MAX_AMOUNT", &limits::MAX_AMOUNT.to_string())
                    .parse()
                    .context("Invalid MAX_AMOUNT value")?,
            },

            security: SecurityConfig {
                cors_allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
                request_timeout_secs: env_var_or("REQUEST_TIMEOUT_SECS", "30")
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent value
    pub fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 || self.api.page_size > self.api.max_page_size {
            bail!(
                "PAGE_SIZE must be between 1 and {}, got {}",
                self.api.max_page_size,
                self.api.page_size
            );
        }

        for (name, value) in [
            ("MAX_COOKING_TIME", self.api.max_cooking_time),
            ("MAX_AMOUNT", self.api.max_amount),
        ] {
            if !(limits::MIN_VALIDATION_VALUE..=limits::STORAGE_MAX_VALUE).contains(&value) {
                bail!(
                    "{name} must be between {} and {}, got {value}",
                    limits::MIN_VALIDATION_VALUE,
                    limits::STORAGE_MAX_VALUE
                );
            }
        }

        if !self.media.url.starts_with('/') || !self.media.url.ends_with('/') {
            bail!("MEDIA_URL must start and end with '/', got {}", self.media.url);
        }

        if self.auth.jwt_expiry_hours <= 0 {
            bail!("JWT_EXPIRY_HOURS must be positive");
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {}",
                self.auth.bcrypt_cost
            );
        }

        if self.media.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be positive");
        }

        if self.environment.is_production() && self.auth.jwt_secret.is_none() {
            warn!("JWT_SECRET is not set in production; tokens will not survive a restart");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Media: {} -> {}\n\
             - Page Size: {}\n\
             - Bounds: cooking_time <= {}, amount <= {}\n\
             - JWT Secret: {}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.media.url,
            self.media.root.display(),
            self.api.page_size,
            self.api.max_cooking_time,
            self.api.max_amount,
            if self.auth.jwt_secret.is_some() {
                "Configured"
            } else {
                "Generated"
            },
            self.security.cors_allowed_origins.join(", ")
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_url() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/foodgram.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/foodgram.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/foodgram.db").to_connection_string(),
            "sqlite:/tmp/foodgram.db"
        );
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://foodgram.example ,"),
            vec!["http://localhost:3000", "https://foodgram.example"]
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        ServerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bounds_outside_storage_range() {
        let mut config = ServerConfig::default();
        config.api.max_amount = 40_000;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.media.url = "media".to_owned();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.auth.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_hides_secret() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = Some("super-secret-value".to_owned());
        let summary = config.summary();
        assert!(!summary.contains("super-secret-value"));
        assert!(summary.contains("Configured"));
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
