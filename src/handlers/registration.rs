//! Participant self-registration handler

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::handlers::MultipartForm;
use crate::models::RegistrationOutcome;
use crate::services::RegistrationForm;
use crate::state::AppState;
use crate::utils::errors::Result;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<RegistrationOutcome>> {
    let mut form = MultipartForm::read(multipart).await?;
    let registration = RegistrationForm {
        event_id: form.field("event_id").map(str::to_string),
        phone: form.field("phone").map(str::to_string),
        selfie: form.take_files("selfie").into_iter().next(),
    };

    Ok(Json(state.gallery().register_participant(registration).await?))
}
