//! Utility functions and helpers for upload validation

use image::ImageFormat;
use std::path::Path;

use crate::error::{AppError, Result};

/// File extensions accepted for uploads.
pub(crate) const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Validate that a file has an allowed extension
pub(crate) fn validate_file_extension(filename: &str, allowed_extensions: &[&str]) -> bool {
    if let Some(ext) = Path::new(filename).extension() {
        if let Some(ext_str) = ext.to_str() {
            return allowed_extensions
                .iter()
                .any(|&e| e.eq_ignore_ascii_case(ext_str));
        }
    }
    false
}

/// Identify the image encoding from its magic bytes.
///
/// Only PNG and JPEG are accepted; the full decode is left to the service.
pub(crate) fn sniff_image_format(data: &[u8]) -> Result<ImageFormat> {
    if data.is_empty() {
        return Err(AppError::InvalidInput("image is empty".to_string()));
    }
    match image::guess_format(data) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        Ok(other) => Err(AppError::InvalidInput(format!(
            "unsupported image format {:?}, expected PNG or JPEG",
            other
        ))),
        Err(_) => Err(AppError::InvalidInput(
            "data is not a recognizable image".to_string(),
        )),
    }
}
