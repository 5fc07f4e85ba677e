//! Authentication service implementation
//!
//! This service handles dashboard administrator login against the statically
//! configured admin list and issues/verifies the bearer session tokens
//! (HS256 JWTs signed with the configured secret).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::utils::errors::{GalleryError, Result};

/// Claims carried by an admin session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin username
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authentication service for dashboard administrators
#[derive(Clone)]
pub struct AuthService {
    admins: Arc<HashMap<String, String>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: &AuthConfig) -> Self {
        let admins = config
            .admin_users
            .iter()
            .map(|a| (a.username.clone(), a.password.clone()))
            .collect();

        Self {
            admins: Arc::new(admins),
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            session_ttl: Duration::hours(config.session_ttl_hours),
        }
    }

    /// Check if a username belongs to a configured admin
    pub fn is_admin(&self, username: &str) -> bool {
        self.admins.contains_key(username)
    }

    /// Verify credentials and issue a session token
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let valid = self
            .admins
            .get(username)
            .map(|expected| constant_time_eq(expected.as_bytes(), password.as_bytes()))
            .unwrap_or(false);

        if !valid {
            self.log_auth_event(username, "login", false);
            return Err(GalleryError::Unauthorized("Invalid credentials".to_string()));
        }

        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        self.log_auth_event(username, "login", true);
        Ok(token)
    }

    /// Validate a session token and return its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            GalleryError::Unauthorized("Invalid session token".to_string())
        })?;

        // Tokens of admins removed from configuration stop working
        if !self.is_admin(&data.claims.sub) {
            warn!(username = %data.claims.sub, "Session token for unknown admin");
            return Err(GalleryError::Unauthorized("Invalid session token".to_string()));
        }

        Ok(data.claims)
    }

    /// Log authentication event
    pub fn log_auth_event(&self, username: &str, action: &str, success: bool) {
        if success {
            info!(username = username, action = action, "Authentication event: success");
        } else {
            warn!(username = username, action = action, "Authentication event: failure");
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
