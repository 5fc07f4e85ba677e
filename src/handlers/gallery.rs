//! Public participant-facing handlers: gallery, slideshow, media and event info

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::models::{Gallery, PublicEvent, Slideshow};
use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::helpers::content_type_for;

/// GET /api/gallery/:token
pub async fn participant_gallery(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Gallery>> {
    Ok(Json(state.gallery().gallery(&token).await?))
}

/// GET /api/slideshow/:event_id
pub async fn slideshow(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Slideshow>> {
    Ok(Json(state.gallery().slideshow(&event_id).await?))
}

/// GET /api/public/events/:id
pub async fn public_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<PublicEvent>> {
    Ok(Json(state.gallery().public_event(&event_id).await?))
}

/// GET /api/media/:filename
pub async fn serve_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.gallery().media(&filename).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes))
}
