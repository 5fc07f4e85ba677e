//! Error handling for ThinkPrint
//!
//! This module defines the main error type used throughout the application
//! and how it is rendered as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Main error type for the gallery backend
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Event not found")]
    EventNotFound { event_id: String },

    /// An event id supplied by a public client that does not resolve
    #[error("Invalid event_id")]
    InvalidEvent { event_id: Option<String> },

    #[error("Gallery not found")]
    GalleryNotFound,

    #[error("File not found")]
    MediaNotFound { filename: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Malformed multipart payload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Too many requests")]
    RateLimitExceeded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

impl GalleryError {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            GalleryError::Unauthorized(_) | GalleryError::Token(_) => StatusCode::UNAUTHORIZED,
            GalleryError::EventNotFound { .. }
            | GalleryError::GalleryNotFound
            | GalleryError::MediaNotFound { .. } => StatusCode::NOT_FOUND,
            GalleryError::InvalidEvent { .. }
            | GalleryError::InvalidInput(_)
            | GalleryError::Multipart(_) => StatusCode::BAD_REQUEST,
            GalleryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self {
            GalleryError::Token(_) => "Invalid session token".to_string(),
            GalleryError::Multipart(_) => "Malformed multipart payload".to_string(),
            e if e.status_code().is_server_error() => "Internal server error".to_string(),
            e => e.to_string(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GalleryError::Database(_) => ErrorSeverity::Critical,
            GalleryError::Migration(_) => ErrorSeverity::Critical,
            GalleryError::Config(_) | GalleryError::ConfigLoad(_) => ErrorSeverity::Critical,
            GalleryError::Unauthorized(_) | GalleryError::Token(_) => ErrorSeverity::Warning,
            GalleryError::RateLimitExceeded => ErrorSeverity::Warning,
            GalleryError::InvalidInput(_)
            | GalleryError::InvalidEvent { .. }
            | GalleryError::Multipart(_)
            | GalleryError::EventNotFound { .. }
            | GalleryError::GalleryNotFound
            | GalleryError::MediaNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                error!(error = %self, severity = %self.severity(), "Request failed");
            }
            ErrorSeverity::Warning => warn!(error = %self, "Request rejected"),
            ErrorSeverity::Info => {}
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
