//! Participant model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: String,
    pub event_id: String,
    pub phone: String,
    pub selfie_filename: String,
    pub gallery_token: String,
    pub registered_at: DateTime<Utc>,
    pub last_access_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateParticipantRequest {
    pub event_id: String,
    pub phone: String,
    pub selfie_filename: String,
}

/// Result of a successful self-registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub participant_id: String,
    pub gallery_token: String,
    pub gallery_url: String,
    pub message: String,
}

/// Participant row as exported for the event organizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub participant_id: String,
    pub phone: String,
    pub selfie: String,
    pub registered_at: DateTime<Utc>,
    pub gallery_token: String,
    pub matched_uploads: Vec<String>,
}
