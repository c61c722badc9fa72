// ABOUTME: Recipe image decoding and media file storage
// ABOUTME: Accepts base64 data URIs or multipart uploads and writes them below the media root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Media storage
//!
//! Images arrive either inline as `data:image/<type>;base64,<payload>` or as a
//! multipart file part. Both are checked against the allowed image types and
//! the file signature, then stored under `MEDIA_ROOT/recipes/images/` with a
//! random name. Records keep the path relative to the media root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use foodgram_core::constants::media::{ALLOWED_IMAGE_SUBTYPES, RECIPE_IMAGE_DIR};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::errors::{AppError, AppResult};

/// Reasons an image payload is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Not of the form `data:image/<type>;base64,<payload>`
    #[error("Image must be a base64 data URI like data:image/png;base64,...")]
    NotDataUri,
    /// Image type outside the allowed set
    #[error("Unsupported image type '{0}'")]
    UnsupportedType(String),
    /// Payload is not valid base64
    #[error("Image payload is not valid base64")]
    InvalidBase64,
    /// Payload is empty
    #[error("Image is empty")]
    Empty,
    /// Bytes do not look like the declared image type
    #[error("Upload a valid image; the file is either not an image or a corrupted image")]
    InvalidContent,
}

/// Image bytes with the file extension they will be stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// Extension without the dot (`jpeg` is stored as `jpg`)
    pub extension: &'static str,
}

impl DecodedImage {
    /// Decode an inline `data:image/<type>;base64,<payload>` value
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] when the value is not an allowed image
    pub fn from_data_uri(value: &str) -> Result<Self, ImageError> {
        let rest = value.trim().strip_prefix("data:").ok_or(ImageError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
        let mime = header.strip_suffix(";base64").ok_or(ImageError::NotDataUri)?;
        let subtype = mime.strip_prefix("image/").ok_or(ImageError::NotDataUri)?;

        let extension = extension_for(subtype)?;
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|_| ImageError::InvalidBase64)?;

        Self::checked(bytes, extension)
    }

    /// Accept a multipart file part with its declared content type
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] when the part is not an allowed image
    pub fn from_upload(content_type: Option<&str>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let mime = content_type.unwrap_or_default();
        let subtype = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .strip_prefix("image/")
            .ok_or_else(|| ImageError::UnsupportedType(mime.to_owned()))?;

        let extension = extension_for(subtype)?;
        Self::checked(bytes, extension)
    }

    fn checked(bytes: Vec<u8>, extension: &'static str) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if sniff_extension(&bytes) != Some(extension) {
            return Err(ImageError::InvalidContent);
        }
        Ok(Self { bytes, extension })
    }
}

fn extension_for(subtype: &str) -> Result<&'static str, ImageError> {
    let subtype = subtype.trim().to_ascii_lowercase();
    match ALLOWED_IMAGE_SUBTYPES
        .iter()
        .copied()
        .find(|allowed| *allowed == subtype.as_str())
    {
        Some("jpeg" | "jpg") => Ok("jpg"),
        Some(allowed) => Ok(allowed),
        None => Err(ImageError::UnsupportedType(subtype)),
    }
}

/// Extension implied by the file signature
fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else if bytes.starts_with(b"BM") {
        Some("bmp")
    } else {
        None
    }
}

/// File storage rooted at `MEDIA_ROOT` and served under `MEDIA_URL`
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    /// Create storage from configuration
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            base_url: config.url.clone(),
        }
    }

    /// Directory holding the stored files
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL of a stored file
    #[must_use]
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_url, relative_path.trim_start_matches('/'))
    }

    /// Write a recipe image under a fresh random name
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory or file cannot be written
    pub async fn save_recipe_image(&self, image: &DecodedImage) -> AppResult<String> {
        let relative = format!("{RECIPE_IMAGE_DIR}/{}.{}", Uuid::new_v4(), image.extension);
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create media directory: {e}"))
            })?;
        }
        tokio::fs::write(&target, &image.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;

        debug!(media.path = %relative, media.bytes = image.bytes.len(), "Stored recipe image");
        Ok(relative)
    }

    /// Remove a stored file; missing files and unsafe paths are ignored
    pub async fn delete(&self, relative_path: &str) {
        let Some(target) = self.resolve(relative_path) else {
            warn!(media.path = %relative_path, "Refusing to delete path outside media root");
            return;
        };

        match tokio::fs::remove_file(&target).await {
            Ok(()) => debug!(media.path = %relative_path, "Removed media file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(media.path = %relative_path, error = %e, "Failed to remove media file"),
        }
    }

    fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let path = Path::new(relative_path);
        let safe = !relative_path.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        safe.then(|| self.root.join(path))
    }
}
