//! Authentication middleware
//!
//! Admin-only handlers take an [`AdminSession`] argument; extraction fails
//! with 401 unless the request carries a valid `Authorization: Bearer` token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::GalleryError;

/// An authenticated dashboard administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
}

/// Token part of an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = GalleryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                debug!(path = %parts.uri.path(), "Admin request without bearer token");
                GalleryError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        let claims = state.auth().verify(token)?;
        Ok(AdminSession { username: claims.sub })
    }
}
