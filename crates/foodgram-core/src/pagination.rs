// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Resolves page/limit query parameters and builds count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::PAGE_QUERY_PARAM;
use crate::errors::{AppError, AppResult};

/// Raw `page` / `limit` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// One-based page number
    pub page: Option<i64>,
    /// Requested page size
    pub limit: Option<i64>,
}

/// Validated page position used by store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl PageRequest {
    /// Resolve query parameters against the configured page size bounds
    ///
    /// A missing or non-positive `limit` falls back to `default_limit`; larger
    /// values are clamped to `max_limit`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when `page` is zero or negative
    pub fn resolve(query: PageQuery, default_limit: u32, max_limit: u32) -> AppResult<Self> {
        let page = match query.page {
            None => 1,
            Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            Some(_) => return Err(AppError::not_found("Invalid page")),
        };
        let limit = match query.limit {
            Some(limit) if limit >= 1 => {
                u32::try_from(limit).unwrap_or(u32::MAX).min(max_limit.max(1))
            }
            _ => default_limit.max(1),
        };
        Ok(Self { page, limit })
    }

    /// Number of rows to skip
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// Number of rows to fetch
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: i64,
    /// Relative link to the next page
    pub next: Option<String>,
    /// Relative link to the previous page
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page, computing links from the request path and query string
    ///
    /// Other query parameters are preserved. The link to the first page drops
    /// the `page` parameter entirely.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when a page past the last one is requested
    pub fn new(
        results: Vec<T>,
        count: i64,
        request: PageRequest,
        path: &str,
        query: Option<&str>,
    ) -> AppResult<Self> {
        let last_page = last_page(count, request.limit);
        if request.page > last_page {
            return Err(AppError::not_found("Invalid page"));
        }

        let next = (request.page < last_page).then(|| link(path, query, Some(request.page + 1)));
        let previous = (request.page > 1).then(|| {
            let target = request.page - 1;
            link(path, query, (target > 1).then_some(target))
        });

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }
}

/// Last valid page number; an empty collection still has page 1
fn last_page(count: i64, limit: u32) -> u32 {
    if count <= 0 {
        return 1;
    }
    let limit = i64::from(limit.max(1));
    u32::try_from((count + limit - 1) / limit).unwrap_or(u32::MAX)
}

fn link(path: &str, query: Option<&str>, page: Option<u32>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let existing = query.unwrap_or_default();
    let mut replaced = false;
    for (key, value) in url::form_urlencoded::parse(existing.as_bytes()) {
        if key == PAGE_QUERY_PARAM {
            if let (Some(page), false) = (page, replaced) {
                serializer.append_pair(PAGE_QUERY_PARAM, &page.to_string());
                replaced = true;
            }
            continue;
        }
        serializer.append_pair(&key, &value);
    }
    if let (Some(page), false) = (page, replaced) {
        serializer.append_pair(PAGE_QUERY_PARAM, &page.to_string());
    }

    let encoded = serializer.finish();
    if encoded.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{encoded}")
    }
}
