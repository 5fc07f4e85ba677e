//! Event administration handlers
//!
//! Every handler here requires an [`AdminSession`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::middleware::AdminSession;
use crate::models::{CreateEventRequest, EventDetails, Lead, UpdateEventRequest, UploadDetails};
use crate::state::AppState;
use crate::utils::errors::{GalleryError, Result};
use crate::utils::logging::log_admin_action;

fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|e| GalleryError::InvalidInput(e.body_text()))
}

/// GET /api/events
pub async fn list_events(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventDetails>>> {
    Ok(Json(state.gallery().list_events().await?))
}

/// POST /api/events
pub async fn create_event(
    admin: AdminSession,
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventDetails>)> {
    let details = state.gallery().create_event(json_body(body)?).await?;
    log_admin_action(&admin.username, "create_event", Some(details.event.id.as_str()));
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/events/:id
pub async fn get_event(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetails>> {
    Ok(Json(state.gallery().get_event(&event_id).await?))
}

/// PUT /api/events/:id
pub async fn update_event(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    body: std::result::Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<EventDetails>> {
    let details = state.gallery().update_event(&event_id, json_body(body)?).await?;
    log_admin_action(&admin.username, "update_event", Some(event_id.as_str()));
    Ok(Json(details))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Value>> {
    state.gallery().delete_event(&event_id).await?;
    log_admin_action(&admin.username, "delete_event", Some(event_id.as_str()));
    Ok(Json(json!({ "message": "Event deleted" })))
}

/// GET /api/events/:id/uploads
pub async fn event_uploads(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<UploadDetails>>> {
    Ok(Json(state.gallery().event_uploads(&event_id).await?))
}

/// GET /api/events/:id/leads
pub async fn event_leads(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Lead>>> {
    let leads = state.gallery().event_leads(&event_id).await?;
    log_admin_action(&admin.username, "export_leads", Some(event_id.as_str()));
    Ok(Json(leads))
}

/// GET /api/events/:id/registration-link
pub async fn registration_link(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Value>> {
    let url = state.gallery().registration_link(&event_id).await?;
    Ok(Json(json!({ "url": url })))
}
