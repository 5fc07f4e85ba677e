//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::models::MAX_EXPIRATION_DAYS;
use crate::utils::errors::{GalleryError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_storage_config(&settings.storage)?;
    validate_auth_config(&settings.auth)?;
    validate_gallery_config(&settings.gallery)?;
    validate_notification_config(&settings.notifications)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(GalleryError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.max_upload_bytes == 0 {
        return Err(GalleryError::Config(
            "Max upload size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GalleryError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(GalleryError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GalleryError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.upload_dir.is_empty() {
        return Err(GalleryError::Config(
            "Upload directory is required".to_string()
        ));
    }

    Ok(())
}

/// Validate admin authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.secret_key.is_empty() {
        return Err(GalleryError::Config(
            "Secret key is required".to_string()
        ));
    }

    if config.admin_users.is_empty() {
        return Err(GalleryError::Config(
            "At least one admin user must be configured".to_string()
        ));
    }

    let incomplete = config
        .admin_users
        .iter()
        .find(|a| a.username.is_empty() || a.password.is_empty());
    if let Some(admin) = incomplete {
        return Err(GalleryError::Config(
            format!("Admin user '{}' needs both a username and a password", admin.username)
        ));
    }

    if config.session_ttl_hours <= 0 {
        return Err(GalleryError::Config(
            "Session TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_gallery_config(config: &super::GalleryConfig) -> Result<()> {
    url::Url::parse(&config.public_base_url).map_err(|e| {
        GalleryError::Config(format!("Invalid public base URL '{}': {}", config.public_base_url, e))
    })?;

    if config.default_expiration_days <= 0 {
        return Err(GalleryError::Config(
            "Default expiration must be at least one day".to_string()
        ));
    }

    if config.default_expiration_days > MAX_EXPIRATION_DAYS {
        return Err(GalleryError::Config(
            format!("Default expiration cannot exceed {} days", MAX_EXPIRATION_DAYS)
        ));
    }

    Ok(())
}

fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    let supported = crate::services::notification::SUPPORTED_LANGUAGES;
    if !supported.contains(&config.language.as_str()) {
        return Err(GalleryError::Config(
            format!(
                "Unsupported notification language: {}. Supported: {:?}",
                config.language, supported
            )
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitSettings) -> Result<()> {
    if config.enabled && (config.requests_per_minute == 0 || config.burst == 0) {
        return Err(GalleryError::Config(
            "Rate limit requests per minute and burst must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GalleryError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GalleryError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(GalleryError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}
