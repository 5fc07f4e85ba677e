//! Upload and match repository implementation

use sqlx::SqlitePool;
use chrono::Utc;
use crate::models::upload::{Upload, CreateUploadRequest};
use crate::utils::errors::GalleryError;
use crate::utils::helpers::generate_id;

const UPLOAD_COLUMNS: &str = "id, event_id, filename, uploaded_at";

#[derive(Debug, Clone)]
pub struct UploadRepository {
    pool: SqlitePool,
}

impl UploadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new upload row
    pub async fn create(&self, request: CreateUploadRequest) -> Result<Upload, GalleryError> {
        let upload = sqlx::query_as::<_, Upload>(&format!(
            r#"
            INSERT INTO uploads (id, event_id, filename, uploaded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {UPLOAD_COLUMNS}
            "#
        ))
        .bind(generate_id())
        .bind(request.event_id)
        .bind(request.filename)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(upload)
    }

    /// Find upload by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Upload>, GalleryError> {
        let upload = sqlx::query_as::<_, Upload>(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM uploads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(upload)
    }

    /// Uploads of an event, oldest first
    pub async fn list_for_event(&self, event_id: &str) -> Result<Vec<Upload>, GalleryError> {
        let uploads = sqlx::query_as::<_, Upload>(&format!(
            r#"
            SELECT {UPLOAD_COLUMNS} FROM uploads
            WHERE event_id = $1
            ORDER BY uploaded_at ASC, id ASC
            "#
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }

    /// Uploads matched to a participant, oldest first
    pub async fn list_for_participant(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Upload>, GalleryError> {
        let uploads = sqlx::query_as::<_, Upload>(
            r#"
            SELECT u.id, u.event_id, u.filename, u.uploaded_at
            FROM uploads u
            INNER JOIN upload_matches m ON u.id = m.upload_id
            WHERE m.participant_id = $1
            ORDER BY u.uploaded_at ASC, u.id ASC
            "#
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }

    /// Record a match; returns false when the pair was already recorded
    pub async fn add_match(
        &self,
        upload_id: &str,
        participant_id: &str,
    ) -> Result<bool, GalleryError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO upload_matches (upload_id, participant_id, matched_at)
            VALUES ($1, $2, $3)
            "#
        )
        .bind(upload_id)
        .bind(participant_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Check if an upload is already matched to a participant
    pub async fn is_matched(
        &self,
        upload_id: &str,
        participant_id: &str,
    ) -> Result<bool, GalleryError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM upload_matches WHERE upload_id = $1 AND participant_id = $2"
        )
        .bind(upload_id)
        .bind(participant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Participant ids matched to an upload
    pub async fn matched_participants(&self, upload_id: &str) -> Result<Vec<String>, GalleryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT participant_id FROM upload_matches
            WHERE upload_id = $1
            ORDER BY matched_at ASC, participant_id ASC
            "#
        )
        .bind(upload_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Upload ids matched to a participant
    pub async fn matched_uploads(&self, participant_id: &str) -> Result<Vec<String>, GalleryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT upload_id FROM upload_matches
            WHERE participant_id = $1
            ORDER BY matched_at ASC, upload_id ASC
            "#
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
