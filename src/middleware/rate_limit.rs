//! Rate limiting middleware
//!
//! Per-client-IP token bucket in front of the public login and registration
//! endpoints.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::config::RateLimitSettings;
use crate::state::AppState;
use crate::utils::errors::{GalleryError, Result};

/// Rate limiting middleware
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Option<Arc<DefaultKeyedRateLimiter<IpAddr>>>,
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance; disabled or zero settings turn it off
    pub fn new(config: &RateLimitSettings) -> Self {
        let limiter = match (config.enabled, NonZeroU32::new(config.requests_per_minute)) {
            (true, Some(per_minute)) => {
                let burst = NonZeroU32::new(config.burst).unwrap_or(per_minute);
                let quota = Quota::per_minute(per_minute).allow_burst(burst);
                Some(Arc::new(RateLimiter::keyed(quota)))
            }
            _ => None,
        };

        Self { limiter }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Check if a client is rate limited
    pub fn check(&self, client: IpAddr) -> Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        match limiter.check_key(&client) {
            Ok(()) => {
                debug!(client = %client, "Rate limit check passed");
                Ok(())
            }
            Err(_) => {
                warn!(client = %client, "Rate limit exceeded");
                Err(GalleryError::RateLimitExceeded)
            }
        }
    }

    /// Drop state of clients whose buckets are full again
    pub fn cleanup_old_entries(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
            debug!(remaining_entries = limiter.len(), "Cleaned up old rate limit entries");
        }
    }
}

/// Axum middleware applying [`RateLimitMiddleware`] to the wrapped routes
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match state.rate_limiter.check(client) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
