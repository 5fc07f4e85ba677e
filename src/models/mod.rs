//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod participant;
pub mod upload;

// Re-export commonly used models
pub use event::{
    CreateEventRequest, Event, EventDetails, PublicEvent, UpdateEventRequest, MAX_EXPIRATION_DAYS,
};
pub use participant::{Participant, CreateParticipantRequest, RegistrationOutcome, Lead};
pub use upload::{Upload, CreateUploadRequest, UploadDetails, MediaItem, Gallery, Slideshow};
