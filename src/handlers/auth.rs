//! Admin login handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    // A missing or malformed body is treated as empty credentials
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let token = state.auth().login(&request.username, &request.password)?;
    Ok(Json(LoginResponse { token }))
}
