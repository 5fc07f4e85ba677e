//! HTTP handlers module
//!
//! This module contains all REST handlers organized by area:
//! - Admin login and event administration (bearer-token protected)
//! - Participant registration and media ingestion
//! - Public gallery, slideshow and media endpoints

pub mod auth;
pub mod events;
pub mod gallery;
pub mod health;
pub mod registration;
pub mod uploads;

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::middleware::rate_limit;
use crate::services::IncomingFile;
use crate::state::AppState;
use crate::utils::errors::{GalleryError, Result};

/// Build the full HTTP router
pub fn router(state: AppState) -> Router {
    let rate_limited = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(registration::register))
        .route_layer(from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/:id",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        .route("/api/events/:id/uploads", get(events::event_uploads))
        .route("/api/events/:id/leads", get(events::event_leads))
        .route("/api/events/:id/registration-link", get(events::registration_link))
        .route("/api/upload", post(uploads::upload_media))
        .route("/api/uploads", post(uploads::upload_media))
        .route("/api/gallery/:token", get(gallery::participant_gallery))
        .route("/api/slideshow/:event_id", get(gallery::slideshow))
        .route("/api/media/:filename", get(gallery::serve_media))
        .route("/api/public/events/:id", get(gallery::public_event))
        .route("/api/health", get(health::health))
        .merge(rate_limited)
        .layer(DefaultBodyLimit::max(state.settings.server.max_upload_bytes))
        .layer(cors_layer(&state.settings.server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Text fields and file parts of a multipart request
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, IncomingFile)>,
}

impl MultipartForm {
    pub(crate) async fn read(
        multipart: std::result::Result<Multipart, MultipartRejection>,
    ) -> Result<Self> {
        let mut multipart = multipart.map_err(|e| {
            GalleryError::InvalidInput(format!("Expected multipart/form-data: {}", e.body_text()))
        })?;
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await?.to_vec();
                    form.files.push((name, IncomingFile { filename, bytes }));
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Remove and return every file part sent under `name`
    pub(crate) fn take_files(&mut self, name: &str) -> Vec<IncomingFile> {
        let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        matching.into_iter().map(|(_, file)| file).collect()
    }
}
