//! Media ingestion handler used by the watch-folder uploader

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::handlers::MultipartForm;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploads: Vec<String>,
}

/// POST /api/uploads (also mounted at /api/upload)
pub async fn upload_media(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut form = MultipartForm::read(multipart).await?;
    let files = form.take_files("file");
    let uploads = state.gallery().ingest_uploads(form.field("event_id"), files).await?;
    Ok(Json(UploadResponse { uploads }))
}
