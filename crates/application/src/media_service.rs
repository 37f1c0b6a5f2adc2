//! Media pool port and selection service.
//!
//! A pool is a directory of media files that may be edited externally while
//! the service runs. Selection re-lists the directory on every call instead
//! of caching, so each pick reflects the current on-disk state.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use randomavatars_core::{AppError, AppResult};
use randomavatars_domain::{MediaKind, MediaSelection};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Port over one media pool directory.
#[async_trait]
pub trait MediaDirectory: Send + Sync {
    /// Lists the file names currently present in the pool.
    ///
    /// Fails with [`AppError::UnreadablePool`] when the directory is missing
    /// or inaccessible.
    async fn list_entries(&self) -> AppResult<Vec<String>>;

    /// Root directory the entries live in.
    fn root_path(&self) -> &Path;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service selecting a random file from one media pool.
#[derive(Clone)]
pub struct MediaPoolService {
    kind: MediaKind,
    directory: Arc<dyn MediaDirectory>,
}

impl MediaPoolService {
    /// Creates a pool service over the given directory.
    #[must_use]
    pub fn new(kind: MediaKind, directory: Arc<dyn MediaDirectory>) -> Self {
        Self { kind, directory }
    }

    /// Which pool this service selects from.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Picks one file uniformly at random from the pool's current listing.
    ///
    /// Fails with [`AppError::EmptyPool`] when the listing has no entries;
    /// listing failures propagate unchanged.
    pub async fn pick(&self) -> AppResult<MediaSelection> {
        let entries = self.directory.list_entries().await?;

        let file_name = entries.choose(&mut rand::rng()).ok_or_else(|| {
            AppError::EmptyPool(format!(
                "{} pool at '{}' has no files",
                self.kind,
                self.directory.root_path().display()
            ))
        })?;

        Ok(MediaSelection::new(
            self.directory.root_path(),
            file_name.as_str(),
        ))
    }
}
