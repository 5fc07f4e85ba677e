//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Generate a new opaque identifier (UUID v4, hyphen-free)
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generate an unguessable gallery token: 128 random bits, hex encoded
pub fn generate_gallery_token() -> String {
    Uuid::from_bytes(rand::random::<[u8; 16]>()).simple().to_string()
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    // Only the final path component of client-supplied names is kept
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a requested media name is a bare file name inside the storage folder
pub fn is_safe_media_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\', '\0'])
        && !filename.starts_with('.')
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 \-]*$").expect("phone pattern is a valid regex")
    })
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone) && phone.chars().filter(|c| c.is_ascii_digit()).count() >= 7
}

/// Guess a content type from a stored media file's extension
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
