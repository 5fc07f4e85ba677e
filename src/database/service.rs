//! Database service layer
//!
//! This module provides a high-level interface to database operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::{DatabasePool, EventRepository, ParticipantRepository, UploadRepository};
use crate::models::*;
use crate::utils::errors::GalleryError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub participants: ParticipantRepository,
    pub uploads: UploadRepository,
    pool: DatabasePool,
}

/// Row counts reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub events: i64,
    pub participants: i64,
    pub uploads: i64,
    pub matches: i64,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool.clone()),
            uploads: UploadRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Fetch an event or fail with `EventNotFound`
    pub async fn require_event(&self, event_id: &str) -> Result<Event, GalleryError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| GalleryError::EventNotFound { event_id: event_id.to_string() })
    }

    /// Attach participant and upload ids to an event
    pub async fn event_details(&self, event: Event) -> Result<EventDetails, GalleryError> {
        let participants = self
            .participants
            .list_for_event(&event.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        let uploads = self
            .uploads
            .list_for_event(&event.id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        Ok(EventDetails {
            expires_at: event.expires_at(),
            event,
            participants,
            uploads,
        })
    }

    /// Uploads of an event with the participants each was matched to
    pub async fn upload_details(&self, event_id: &str) -> Result<Vec<UploadDetails>, GalleryError> {
        let uploads = self.uploads.list_for_event(event_id).await?;
        let mut details = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let matched_participants = self.uploads.matched_participants(&upload.id).await?;
            details.push(UploadDetails { upload, matched_participants });
        }

        Ok(details)
    }

    /// Export participants of an event as leads
    pub async fn leads(&self, event_id: &str) -> Result<Vec<Lead>, GalleryError> {
        let participants = self.participants.list_for_event(event_id).await?;
        let mut leads = Vec::with_capacity(participants.len());

        for participant in participants {
            let matched_uploads = self.uploads.matched_uploads(&participant.id).await?;
            leads.push(Lead {
                participant_id: participant.id,
                phone: participant.phone,
                selfie: participant.selfie_filename,
                registered_at: participant.registered_at,
                gallery_token: participant.gallery_token,
                matched_uploads,
            });
        }

        Ok(leads)
    }

    /// Stored file names owned by an event (uploads and selfies)
    pub async fn event_files(&self, event_id: &str) -> Result<Vec<String>, GalleryError> {
        let mut files: Vec<String> = self
            .uploads
            .list_for_event(event_id)
            .await?
            .into_iter()
            .map(|u| u.filename)
            .collect();
        files.extend(
            self.participants
                .list_for_event(event_id)
                .await?
                .into_iter()
                .map(|p| p.selfie_filename),
        );

        Ok(files)
    }

    /// Events that expired at `now`
    pub async fn expired_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, GalleryError> {
        self.events.find_expired(now).await
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<SystemStats, GalleryError> {
        let participants: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await?;
        let uploads: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM uploads")
            .fetch_one(&self.pool)
            .await?;
        let matches: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM upload_matches")
            .fetch_one(&self.pool)
            .await?;

        Ok(SystemStats {
            events: self.events.count().await?,
            participants: participants.0,
            uploads: uploads.0,
            matches: matches.0,
        })
    }
}
