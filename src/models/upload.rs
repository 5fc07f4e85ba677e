//! Upload model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Upload {
    pub id: String,
    pub event_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUploadRequest {
    pub event_id: String,
    pub filename: String,
}

/// Admin listing entry: an upload plus the participants it was matched to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDetails {
    #[serde(flatten)]
    pub upload: Upload,
    pub matched_participants: Vec<String>,
}

/// One item of a gallery or slideshow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub upload_id: String,
    pub filename: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Upload> for MediaItem {
    fn from(upload: Upload) -> Self {
        Self {
            url: format!("/api/media/{}", upload.filename),
            upload_id: upload.id,
            filename: upload.filename,
            uploaded_at: upload.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gallery {
    pub participant_id: String,
    pub event_id: String,
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slideshow {
    pub event_id: String,
    pub media: Vec<MediaItem>,
}
