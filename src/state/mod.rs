//! Application state
//!
//! Shared, cheaply clonable handle passed to every HTTP handler.

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::RateLimitMiddleware;
use crate::services::{AuthService, GalleryService, ServiceFactory};

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub database: DatabaseService,
    pub services: Arc<ServiceFactory>,
    pub rate_limiter: RateLimitMiddleware,
}

impl AppState {
    pub fn new(settings: Settings, database: DatabaseService, services: ServiceFactory) -> Self {
        let rate_limiter = RateLimitMiddleware::new(&settings.rate_limit);
        Self {
            settings: Arc::new(settings),
            database,
            services: Arc::new(services),
            rate_limiter,
        }
    }

    pub fn gallery(&self) -> &GalleryService {
        &self.services.gallery_service
    }

    pub fn auth(&self) -> &AuthService {
        &self.services.auth_service
    }
}
