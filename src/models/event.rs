//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Longest accepted event lifetime, in days
pub const MAX_EXPIRATION_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub phrase: String,
    pub logo_url: Option<String>,
    pub expiration_days: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Moment after which the event and its galleries are purged
    ///
    /// Saturates at the latest representable instant instead of overflowing.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Duration::try_days(self.expiration_days)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub phrase: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub expiration_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub phrase: Option<String>,
    pub logo_url: Option<String>,
    pub expiration_days: Option<i64>,
}

/// Admin-facing event representation with its owned records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub expires_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub uploads: Vec<String>,
}

/// Subset of event fields shown before a participant registers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicEvent {
    pub id: String,
    pub name: String,
    pub phrase: String,
    pub logo_url: Option<String>,
    pub expiration_days: i64,
}

impl From<Event> for PublicEvent {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            phrase: event.phrase,
            logo_url: event.logo_url,
            expiration_days: event.expiration_days,
        }
    }
}
