//! Filesystem implementation of the media directory port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use randomavatars_application::MediaDirectory;
use randomavatars_core::{AppError, AppResult};

/// Media pool backed by a directory on the local filesystem.
///
/// The root is fixed at construction; every listing re-reads the directory so
/// external edits to the pool are visible on the next request.
#[derive(Debug, Clone)]
pub struct FsMediaDirectory {
    root: PathBuf,
}

impl FsMediaDirectory {
    /// Wraps an existing directory path without touching the filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the pool directory when missing and resolves it to an
    /// absolute path. Idempotent; intended for startup, where a failure is
    /// fatal because the service cannot operate without its pools.
    pub async fn bootstrap(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();

        tokio::fs::create_dir_all(&root).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create media directory '{}': {error}",
                root.display()
            ))
        })?;

        let root = tokio::fs::canonicalize(&root).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve media directory '{}': {error}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }
}

#[async_trait]
impl MediaDirectory for FsMediaDirectory {
    async fn list_entries(&self) -> AppResult<Vec<String>> {
        let unreadable = |error: std::io::Error| {
            AppError::UnreadablePool(format!(
                "failed to read media directory '{}': {error}",
                self.root.display()
            ))
        };

        let mut reader = tokio::fs::read_dir(&self.root).await.map_err(unreadable)?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(unreadable)? {
            let file_type = entry.file_type().await.map_err(unreadable)?;
            if !file_type.is_file() {
                continue;
            }

            // Non-UTF-8 names cannot appear in a selection; skip them.
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_owned());
            }
        }

        Ok(entries)
    }

    fn root_path(&self) -> &Path {
        self.root.as_path()
    }
}

#[cfg(test)]
mod tests {
    use randomavatars_application::MediaDirectory;
    use randomavatars_core::AppError;

    use super::FsMediaDirectory;

    fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap_or_else(|error| panic!("failed to create temp dir: {error}"))
    }

    fn write_file(path: &std::path::Path, contents: &[u8]) {
        std::fs::write(path, contents)
            .unwrap_or_else(|error| panic!("failed to write '{}': {error}", path.display()));
    }

    #[tokio::test]
    async fn lists_regular_files_only() {
        let temp = temp_dir();
        write_file(&temp.path().join("a.png"), b"png");
        write_file(&temp.path().join("b.gif"), b"gif");
        std::fs::create_dir(temp.path().join("nested"))
            .unwrap_or_else(|error| panic!("failed to create subdirectory: {error}"));

        let directory = FsMediaDirectory::new(temp.path());
        let listed = directory.list_entries().await;
        assert!(listed.is_ok());

        let mut entries = listed.unwrap_or_default();
        entries.sort();
        assert_eq!(entries, ["a.png", "b.gif"]);
    }

    #[tokio::test]
    async fn missing_root_is_an_unreadable_pool() {
        let temp = temp_dir();
        let directory = FsMediaDirectory::new(temp.path().join("missing"));

        let result = directory.list_entries().await;
        assert!(matches!(result, Err(AppError::UnreadablePool(_))));
    }

    #[tokio::test]
    async fn bootstrap_creates_nested_directories_idempotently() {
        let temp = temp_dir();
        let root = temp.path().join("media").join("photos");

        let first = FsMediaDirectory::bootstrap(&root).await;
        assert!(first.is_ok());
        let second = FsMediaDirectory::bootstrap(&root).await;
        assert!(second.is_ok());

        let Ok(directory) = second else { unreachable!() };
        assert!(directory.root_path().is_absolute());
        assert!(directory.root_path().is_dir());

        let listed = directory.list_entries().await;
        assert!(listed.is_ok_and(|entries| entries.is_empty()));
    }
}
