// ABOUTME: Configuration module root
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

/// Environment variable parsing into typed configuration
pub mod environment;

pub use environment::{
    ApiConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, MediaConfig, SecurityConfig,
    ServerConfig,
};
