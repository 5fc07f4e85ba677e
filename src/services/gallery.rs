//! Gallery service
//!
//! Owns the participant-facing flow: media ingestion, self-registration,
//! running the matcher and resolving gallery tokens, plus the event
//! administration operations that sit on top of the repositories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::GalleryConfig;
use crate::database::{DatabaseService, NewEvent};
use crate::models::*;
use crate::services::matching::FaceMatcher;
use crate::services::notification::NotificationService;
use crate::services::storage::{MediaKind, MediaStorage};
use crate::utils::errors::{GalleryError, Result};
use crate::utils::helpers::{generate_id, is_valid_phone, join_url, normalize_whitespace};
use crate::utils::logging;

/// A file received from a client
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Raw registration form fields, validated by [`GalleryService::register_participant`]
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub event_id: Option<String>,
    pub phone: Option<String>,
    pub selfie: Option<IncomingFile>,
}

#[derive(Clone)]
pub struct GalleryService {
    db: DatabaseService,
    storage: MediaStorage,
    matcher: Arc<dyn FaceMatcher>,
    notifications: NotificationService,
    config: GalleryConfig,
}

impl GalleryService {
    pub fn new(
        db: DatabaseService,
        storage: MediaStorage,
        matcher: Arc<dyn FaceMatcher>,
        notifications: NotificationService,
        config: GalleryConfig,
    ) -> Self {
        Self {
            db,
            storage,
            matcher,
            notifications,
            config,
        }
    }

    pub fn database(&self) -> &DatabaseService {
        &self.db
    }

    /// Public URL of a participant's gallery
    pub fn gallery_url(&self, token: &str) -> String {
        join_url(&self.config.public_base_url, &format!("gallery/{}", token))
    }

    /// Public URL of an event's registration page
    pub fn registration_url(&self, event_id: &str) -> String {
        join_url(
            &self.config.public_base_url,
            &format!("register?event={}", urlencoding::encode(event_id)),
        )
    }

    // ------------------------------------------------------------------
    // Event administration

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<EventDetails> {
        let name = normalize_whitespace(&request.name);
        if name.is_empty() {
            return Err(GalleryError::InvalidInput("Event name is required".to_string()));
        }
        let expiration_days = request
            .expiration_days
            .unwrap_or(self.config.default_expiration_days);
        validate_expiration(expiration_days)?;

        let event = self
            .db
            .events
            .create(
                &generate_id(),
                NewEvent {
                    name,
                    phrase: request.phrase.map(|p| p.trim().to_string()).unwrap_or_default(),
                    logo_url: request.logo_url.filter(|l| !l.trim().is_empty()),
                    expiration_days,
                },
            )
            .await?;

        info!(event_id = %event.id, name = %event.name, "Event created");
        self.db.event_details(event).await
    }

    pub async fn list_events(&self) -> Result<Vec<EventDetails>> {
        let events = self.db.events.list().await?;
        let mut details = Vec::with_capacity(events.len());
        for event in events {
            details.push(self.db.event_details(event).await?);
        }
        Ok(details)
    }

    pub async fn get_event(&self, event_id: &str) -> Result<EventDetails> {
        let event = self.db.require_event(event_id).await?;
        self.db.event_details(event).await
    }

    pub async fn update_event(
        &self,
        event_id: &str,
        mut request: UpdateEventRequest,
    ) -> Result<EventDetails> {
        if let Some(name) = request.name.as_deref() {
            let name = normalize_whitespace(name);
            if name.is_empty() {
                return Err(GalleryError::InvalidInput("Event name is required".to_string()));
            }
            request.name = Some(name);
        }
        if let Some(days) = request.expiration_days {
            validate_expiration(days)?;
        }

        let event = self
            .db
            .events
            .update(event_id, request)
            .await?
            .ok_or_else(|| GalleryError::EventNotFound { event_id: event_id.to_string() })?;

        info!(event_id = %event.id, "Event updated");
        self.db.event_details(event).await
    }

    /// Delete an event, its records and its stored files
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        self.db.require_event(event_id).await?;
        let files = self.db.event_files(event_id).await?;

        if !self.db.events.delete(event_id).await? {
            return Err(GalleryError::EventNotFound { event_id: event_id.to_string() });
        }

        let removed = self.remove_files(&files).await;
        info!(event_id = %event_id, removed_files = removed, "Event deleted");
        Ok(())
    }

    pub async fn public_event(&self, event_id: &str) -> Result<PublicEvent> {
        Ok(self.db.require_event(event_id).await?.into())
    }

    pub async fn event_uploads(&self, event_id: &str) -> Result<Vec<UploadDetails>> {
        self.db.require_event(event_id).await?;
        self.db.upload_details(event_id).await
    }

    pub async fn event_leads(&self, event_id: &str) -> Result<Vec<Lead>> {
        self.db.require_event(event_id).await?;
        self.db.leads(event_id).await
    }

    pub async fn registration_link(&self, event_id: &str) -> Result<String> {
        self.db.require_event(event_id).await?;
        Ok(self.registration_url(event_id))
    }

    // ------------------------------------------------------------------
    // Participant flow

    /// Store uploaded media for an event and match it against participants
    pub async fn ingest_uploads(
        &self,
        event_id: Option<&str>,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<String>> {
        let event = self.resolve_public_event(event_id).await?;
        if files.is_empty() {
            return Err(GalleryError::InvalidInput("No file part".to_string()));
        }

        let participants = self.db.participants.list_for_event(&event.id).await?;
        let mut created = Vec::with_capacity(files.len());

        for file in files {
            if file.filename.trim().is_empty() {
                debug!(event_id = %event.id, "Skipping file part without a name");
                continue;
            }

            let filename = self.storage.save(MediaKind::Upload, &file.filename, &file.bytes).await?;
            let request = CreateUploadRequest {
                event_id: event.id.clone(),
                filename: filename.clone(),
            };
            let upload = match self.db.uploads.create(request).await {
                Ok(upload) => upload,
                Err(e) => {
                    self.discard_file(&filename).await;
                    return Err(e);
                }
            };

            let matches = self.match_upload(&upload, &event, &participants).await?;
            logging::log_ingestion(&event.id, &upload.id, &upload.filename, matches);
            created.push(upload.id);
        }

        Ok(created)
    }

    /// Register a participant and match the event's existing uploads against them
    pub async fn register_participant(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationOutcome> {
        let event = self.resolve_public_event(form.event_id.as_deref()).await?;

        let phone = form.phone.as_deref().map(str::trim).unwrap_or_default();
        if phone.is_empty() {
            return Err(GalleryError::InvalidInput("Phone number is required".to_string()));
        }
        if !is_valid_phone(phone) {
            return Err(GalleryError::InvalidInput("Phone number is invalid".to_string()));
        }

        let selfie = match form.selfie {
            Some(selfie) if !selfie.bytes.is_empty() => selfie,
            _ => return Err(GalleryError::InvalidInput("Selfie image is required".to_string())),
        };

        let selfie_filename = self
            .storage
            .save(MediaKind::Selfie, &selfie.filename, &selfie.bytes)
            .await?;
        let request = CreateParticipantRequest {
            event_id: event.id.clone(),
            phone: phone.to_string(),
            selfie_filename: selfie_filename.clone(),
        };
        let participant = match self.db.participants.create(request).await {
            Ok(participant) => participant,
            Err(e) => {
                self.discard_file(&selfie_filename).await;
                return Err(e);
            }
        };

        // Existing media may already contain the new participant
        let candidates = self.db.participants.list_for_event(&event.id).await?;
        for upload in self.db.uploads.list_for_event(&event.id).await? {
            if !self.db.uploads.is_matched(&upload.id, &participant.id).await? {
                self.match_upload(&upload, &event, &candidates).await?;
            }
        }

        let matched = self.db.uploads.matched_uploads(&participant.id).await?.len();
        logging::log_registration(&event.id, &participant.id, matched);

        Ok(RegistrationOutcome {
            gallery_url: self.gallery_url(&participant.gallery_token),
            participant_id: participant.id,
            gallery_token: participant.gallery_token,
            message: self.notifications.registration_confirmation(),
        })
    }

    /// Resolve a gallery token to the participant's matched media
    pub async fn gallery(&self, token: &str) -> Result<Gallery> {
        let participant = self
            .db
            .participants
            .find_by_token(token)
            .await?
            .ok_or(GalleryError::GalleryNotFound)?;

        self.db.participants.touch_last_access(&participant.id).await?;

        let media: Vec<MediaItem> = self
            .db
            .uploads
            .list_for_participant(&participant.id)
            .await?
            .into_iter()
            .map(MediaItem::from)
            .collect();

        logging::log_gallery_access(&participant.id, media.len());
        Ok(Gallery {
            participant_id: participant.id,
            event_id: participant.event_id,
            media,
        })
    }

    /// All media of an event, for the public slideshow
    pub async fn slideshow(&self, event_id: &str) -> Result<Slideshow> {
        let event = self.db.require_event(event_id).await?;
        let media = self
            .db
            .uploads
            .list_for_event(&event.id)
            .await?
            .into_iter()
            .map(MediaItem::from)
            .collect();

        Ok(Slideshow { event_id: event.id, media })
    }

    /// Bytes of a stored media file
    pub async fn media(&self, filename: &str) -> Result<Vec<u8>> {
        self.storage.read(filename).await
    }

    // ------------------------------------------------------------------
    // Maintenance

    /// Delete every event whose expiration horizon passed; returns how many
    pub async fn purge_expired_events(&self, now: DateTime<Utc>) -> Result<usize> {
        let expired = self.db.expired_events(now).await?;
        let mut removed_files = 0;

        for event in &expired {
            let files = self.db.event_files(&event.id).await?;
            self.db.events.delete(&event.id).await?;
            removed_files += self.remove_files(&files).await;
            debug!(event_id = %event.id, expired_at = %event.expires_at(), "Expired event purged");
        }

        logging::log_cleanup(expired.len(), removed_files);
        Ok(expired.len())
    }

    // ------------------------------------------------------------------

    async fn resolve_public_event(&self, event_id: Option<&str>) -> Result<Event> {
        let event_id = event_id.map(str::trim).filter(|id| !id.is_empty());
        let Some(event_id) = event_id else {
            return Err(GalleryError::InvalidEvent { event_id: None });
        };

        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| GalleryError::InvalidEvent { event_id: Some(event_id.to_string()) })
    }

    /// Run the matcher on one upload and record new matches; returns how many were new
    async fn match_upload(
        &self,
        upload: &Upload,
        event: &Event,
        candidates: &[Participant],
    ) -> Result<usize> {
        if candidates.is_empty() {
            return Ok(0);
        }

        let mut new_matches = 0;
        for participant_id in self.matcher.find_matches(upload, candidates) {
            if !self.db.uploads.add_match(&upload.id, &participant_id).await? {
                continue;
            }
            new_matches += 1;

            if let Some(participant) = candidates.iter().find(|p| p.id == participant_id) {
                let url = self.gallery_url(&participant.gallery_token);
                self.notifications.send_media_notification(participant, event, &url);
            }
        }

        Ok(new_matches)
    }

    /// Drop a stored file whose database row could not be written
    async fn discard_file(&self, filename: &str) {
        if let Err(e) = self.storage.remove(filename).await {
            warn!(filename = %filename, error = %e, "Failed to discard orphaned file");
        }
    }

    async fn remove_files(&self, files: &[String]) -> usize {
        let mut removed = 0;
        for file in files {
            match self.storage.remove(file).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(filename = %file, error = %e, "Failed to remove stored file"),
            }
        }
        removed
    }
}

fn validate_expiration(days: i64) -> Result<()> {
    if days <= 0 {
        return Err(GalleryError::InvalidInput("expiration_days must be positive".to_string()));
    }
    if days > MAX_EXPIRATION_DAYS {
        return Err(GalleryError::InvalidInput(format!(
            "expiration_days cannot exceed {}",
            MAX_EXPIRATION_DAYS
        )));
    }
    Ok(())
}
