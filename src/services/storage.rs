//! Local media storage
//!
//! Uploaded media and selfies are written to a single flat folder. Stored
//! names are `<uuid>_<sanitized original name>` (selfies carry an extra
//! `selfie_` prefix), so client names can never collide or escape the folder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::utils::errors::{GalleryError, Result};
use crate::utils::helpers::{generate_id, is_safe_media_name, sanitize_filename};

/// What a stored file is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Upload,
    Selfie,
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Open the storage folder, creating it if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(path = %root.display(), "Media storage ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stored name for a client-supplied file name
    pub fn stored_name(kind: MediaKind, original_name: &str) -> String {
        let base = format!("{}_{}", generate_id(), sanitize_filename(original_name));
        match kind {
            MediaKind::Upload => base,
            MediaKind::Selfie => format!("selfie_{base}"),
        }
    }

    /// Write a file and return its stored name
    pub async fn save(&self, kind: MediaKind, original_name: &str, bytes: &[u8]) -> Result<String> {
        let filename = Self::stored_name(kind, original_name);
        tokio::fs::write(self.root.join(&filename), bytes).await?;
        debug!(filename = %filename, size = bytes.len(), kind = ?kind, "Media stored");
        Ok(filename)
    }

    /// Read a stored file by its stored name
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        if !is_safe_media_name(filename) {
            warn!(filename = %filename, "Rejected unsafe media name");
            return Err(GalleryError::MediaNotFound { filename: filename.to_string() });
        }

        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GalleryError::MediaNotFound { filename: filename.to_string() })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file; returns false when it did not exist
    pub async fn remove(&self, filename: &str) -> Result<bool> {
        if !is_safe_media_name(filename) {
            return Ok(false);
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
