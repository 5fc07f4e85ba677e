//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod participant;
pub mod upload;

// Re-export repositories
pub use event::{EventRepository, NewEvent};
pub use participant::ParticipantRepository;
pub use upload::UploadRepository;
