//! Participant repository implementation

use sqlx::SqlitePool;
use chrono::Utc;
use crate::models::participant::{Participant, CreateParticipantRequest};
use crate::utils::errors::GalleryError;
use crate::utils::helpers::{generate_gallery_token, generate_id};

const PARTICIPANT_COLUMNS: &str =
    "id, event_id, phone, selfie_filename, gallery_token, registered_at, last_access_at";

#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a participant with a freshly issued gallery token
    pub async fn create(
        &self,
        request: CreateParticipantRequest,
    ) -> Result<Participant, GalleryError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participants
                (id, event_id, phone, selfie_filename, gallery_token, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(generate_id())
        .bind(request.event_id)
        .bind(request.phone)
        .bind(request.selfie_filename)
        .bind(generate_gallery_token())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Find participant by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Participant>, GalleryError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Resolve a gallery token to its participant
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Participant>, GalleryError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE gallery_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Participants registered for an event, in registration order
    pub async fn list_for_event(&self, event_id: &str) -> Result<Vec<Participant>, GalleryError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS} FROM participants
            WHERE event_id = $1
            ORDER BY registered_at ASC, id ASC
            "#
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// Record that the participant opened their gallery
    pub async fn touch_last_access(&self, id: &str) -> Result<(), GalleryError> {
        sqlx::query("UPDATE participants SET last_access_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
