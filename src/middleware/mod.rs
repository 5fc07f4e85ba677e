//! Middleware module
//!
//! This module contains middleware for request processing

pub mod auth;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::AdminSession;
pub use rate_limit::{rate_limit, RateLimitMiddleware};
