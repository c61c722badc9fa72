// ABOUTME: Tests for loading server configuration from environment variables
// ABOUTME: Serialized because they mutate process-wide environment state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use foodgram::config::{DatabaseUrl, ServerConfig};
use serial_test::serial;

const VARS: [&str; 7] = [
    "HTTP_PORT",
    "DATABASE_URL",
    "PAGE_SIZE",
    "MAX_COOKING_TIME",
    "MEDIA_URL",
    "CORS_ALLOWED_ORIGINS",
    "MAX_AMOUNT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9100");
    env::set_var("DATABASE_URL", "sqlite:/var/lib/foodgram/foodgram.db");
    env::set_var("PAGE_SIZE", "12");
    env::set_var("MAX_COOKING_TIME", "600");
    env::set_var("MEDIA_URL", "/uploads/");
    env::set_var("CORS_ALLOWED_ORIGINS", "http://localhost:3000,https://foodgram.example");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 9100);
    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("/var/lib/foodgram/foodgram.db")
        }
    );
    assert_eq!(config.api.page_size, 12);
    assert_eq!(config.api.max_cooking_time, 600);
    assert_eq!(config.media.url, "/uploads/");
    assert_eq!(config.security.cors_allowed_origins.len(), 2);
}

#[test]
#[serial]
fn test_from_env_rejects_bad_values() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert!(format!("{err:#}").contains("HTTP_PORT"));

    clear_env();
    env::set_var("MAX_AMOUNT", "50000");
    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("MAX_AMOUNT"));
    clear_env();
}
