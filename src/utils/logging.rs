//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ThinkPrint backend.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};
use crate::config::LoggingConfig;
use crate::utils::errors::{GalleryError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| {
        GalleryError::Config(format!("Invalid log filter '{}': {}", config.level, e))
    })?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match config.format.as_str() {
        "json" => fmt::layer().json().with_writer(std::io::stdout).boxed(),
        _ => fmt::layer().with_writer(std::io::stdout).boxed(),
    });

    let guard = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "thinkprint.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            layers.push(fmt::layer().json().with_ansi(false).with_writer(non_blocking).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| GalleryError::Config(format!("Logging already initialized: {}", e)))?;

    info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(guard)
}

/// Log admin actions
pub fn log_admin_action(admin: &str, action: &str, target: Option<&str>) {
    warn!(
        admin = admin,
        action = action,
        resource = target,
        "Admin action performed"
    );
}

/// Log participant registrations
pub fn log_registration(event_id: &str, participant_id: &str, matched_uploads: usize) {
    info!(
        event_id = event_id,
        participant_id = participant_id,
        matched_uploads = matched_uploads,
        "Participant registered"
    );
}

/// Log media ingestion
pub fn log_ingestion(event_id: &str, upload_id: &str, filename: &str, matches: usize) {
    info!(
        event_id = event_id,
        upload_id = upload_id,
        filename = filename,
        matches = matches,
        "Media ingested"
    );
}

/// Log gallery access
pub fn log_gallery_access(participant_id: &str, media_count: usize) {
    debug!(
        participant_id = participant_id,
        media_count = media_count,
        "Gallery accessed"
    );
}

/// Log database maintenance results
pub fn log_cleanup(expired_events: usize, removed_files: usize) {
    if expired_events > 0 {
        info!(
            expired_events = expired_events,
            removed_files = removed_files,
            "Expired events purged"
        );
    } else {
        debug!("No expired events to purge");
    }
}
