//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod gallery;
pub mod matching;
pub mod notification;
pub mod storage;

// Re-export commonly used services
pub use auth::{AuthService, SessionClaims};
pub use gallery::{GalleryService, IncomingFile, RegistrationForm};
pub use matching::{FaceMatcher, MatchStrategy, StubMatcher};
pub use notification::{LogSender, MessageSender, NotificationService, NotificationStats};
pub use storage::{MediaKind, MediaStorage};

use std::sync::Arc;

use serde::Serialize;

use crate::config::Settings;
use crate::database::{health_check, DatabaseService};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub gallery_service: GalleryService,
    pub notification_service: NotificationService,
    pub storage: MediaStorage,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub async fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        Self::with_sender(settings, db, Arc::new(LogSender)).await
    }

    /// Same as [`ServiceFactory::new`] with an explicit message transport
    pub async fn with_sender(
        settings: &Settings,
        db: DatabaseService,
        sender: Arc<dyn MessageSender>,
    ) -> Result<Self> {
        let auth_service = AuthService::new(&settings.auth);
        let storage = MediaStorage::new(&settings.storage.upload_dir).await?;
        let matcher: Arc<dyn FaceMatcher> = Arc::new(StubMatcher::from_config(&settings.matching));
        let notification_service = NotificationService::new(settings.notifications.clone(), sender);
        let gallery_service = GalleryService::new(
            db,
            storage.clone(),
            matcher,
            notification_service.clone(),
            settings.gallery.clone(),
        );

        Ok(Self {
            auth_service,
            gallery_service,
            notification_service,
            storage,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = health_check(self.gallery_service.database().pool()).await.is_ok();
        let storage_ready = tokio::fs::metadata(self.storage.root())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        ServiceHealthStatus {
            database_healthy,
            storage_ready,
            notifications: self.notification_service.get_stats(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub storage_ready: bool,
    pub notifications: NotificationStats,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy && self.storage_ready
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.storage_ready {
            issues.push("Media storage folder unavailable".to_string());
        }

        issues
    }
}
