//! ThinkPrint event gallery backend
//!
//! Backend for event photo galleries: attendees self-register with a phone
//! number and a selfie, photographers' media is ingested per event, a face
//! matcher associates media with participants, and each participant gets a
//! private gallery reachable through an opaque token.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GalleryError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::router;
pub use services::ServiceFactory;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
