//! Event repository implementation

use sqlx::SqlitePool;
use chrono::{DateTime, Utc};
use crate::models::event::{Event, UpdateEventRequest};
use crate::utils::errors::GalleryError;

const EVENT_COLUMNS: &str = "id, name, phrase, logo_url, expiration_days, created_at, updated_at";

/// Fully resolved values for a new event row
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub phrase: String,
    pub logo_url: Option<String>,
    pub expiration_days: i64,
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, id: &str, event: NewEvent) -> Result<Event, GalleryError> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, name, phrase, logo_url, expiration_days, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(event.name)
        .bind(event.phrase)
        .bind(event.logo_url)
        .bind(event.expiration_days)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Event>, GalleryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event, leaving unspecified fields untouched
    pub async fn update(
        &self,
        id: &str,
        request: UpdateEventRequest,
    ) -> Result<Option<Event>, GalleryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                phrase = COALESCE($3, phrase),
                logo_url = COALESCE($4, logo_url),
                expiration_days = COALESCE($5, expiration_days),
                updated_at = $6
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.phrase)
        .bind(request.logo_url)
        .bind(request.expiration_days)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event together with its participants, uploads and matches
    pub async fn delete(&self, id: &str) -> Result<bool, GalleryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM upload_matches
            WHERE upload_id IN (SELECT id FROM uploads WHERE event_id = $1)
               OR participant_id IN (SELECT id FROM participants WHERE event_id = $1)
            "#
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM uploads WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM participants WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all events, newest first
    pub async fn list(&self) -> Result<Vec<Event>, GalleryError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events whose expiration horizon has passed at `now`
    pub async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<Event>, GalleryError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().filter(|e| e.is_expired(now)).collect())
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, GalleryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
