//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::services::matching::MatchStrategy;

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub gallery: GalleryConfig,
    pub matching: MatchingConfig,
    pub notifications: NotificationConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Local media storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: String,
}

/// A statically configured dashboard administrator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminUser {
    pub username: String,
    pub password: String,
}

/// Admin authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret_key: String,
    pub session_ttl_hours: i64,
    pub admin_users: Vec<AdminUser>,
}

/// Gallery and event lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base URL of the participant-facing microsite
    pub public_base_url: String,
    pub default_expiration_days: i64,
    /// Zero disables the expired-event purge
    pub cleanup_interval_minutes: u64,
}

/// Face matching stub configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub strategy: MatchStrategy,
    pub max_matches_per_upload: usize,
}

/// Participant notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub language: String,
    /// Phones starting with this prefix are reached over WhatsApp, others over SMS
    pub whatsapp_prefix: String,
}

/// Rate limiting for public write endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_minute: u32,
    pub burst: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily rolling log files; stdout only when unset
    pub directory: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("THINKPRINT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::GalleryError> {
        super::validation::validate_settings(self)
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 50 * 1024 * 1024,
            allowed_origins: vec![],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://thinkprint.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            session_ttl_hours: 24,
            admin_users: vec![],
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:3000".to_string(),
            default_expiration_days: 30,
            cleanup_interval_minutes: 60,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Random,
            max_matches_per_upload: 2,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "pt".to_string(),
            whatsapp_prefix: "+55".to_string(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 30,
            burst: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
