// ABOUTME: HTTP middleware for request tracing, authentication and CORS
// ABOUTME: Provides request ID generation, span creation and token authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub mod auth;
pub mod cors;
pub mod tracing;

// Authentication middleware
pub use auth::{AuthMiddleware, AuthUser};

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{create_request_span, MakeRequestUuid, REQUEST_ID_HEADER};
