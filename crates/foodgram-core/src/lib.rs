// ABOUTME: Core types and constants for the Foodgram recipe sharing service
// ABOUTME: Foundation crate with error handling, pagination and validation bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types and constants for the Foodgram
//! service. It changes rarely, which keeps incremental builds of the server
//! crate fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and field-level validation errors
//! - **constants**: Field lengths, value bounds and defaults
//! - **pagination**: Page-number pagination with relative `next`/`previous` links

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page-number pagination for list endpoints
pub mod pagination;
