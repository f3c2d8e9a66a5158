//! File-backed repository implementation.
//!
//! Persists the snapshot as one JSON document. Writes go to a sibling
//! temporary file that is then renamed over the target, so the table and its
//! timestamp are replaced together and a reader never sees a partial file.

use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::db::repository::*;
use crate::models::Snapshot;

/// Durable single-slot repository stored on local disk.
#[derive(Clone, Debug)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Create a repository storing its snapshot at `path`.
    ///
    /// Parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn io_error(&self, operation: &str, err: std::io::Error) -> RepositoryError {
        RepositoryError::unavailable_with_context(
            err.to_string(),
            ErrorContext::new(operation)
                .with_backend("file")
                .with_details(format!("path={}", self.path.display())),
        )
    }
}

/// Replace `path` with `bytes`. The temporary file lives in the target's
/// directory so `persist` is a same-filesystem rename, and it is removed on
/// drop if anything fails before that.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl SnapshotRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self.parent_dir() {
            Some(parent) => Ok(tokio::fs::create_dir_all(parent).await.is_ok()),
            None => Ok(true),
        }
    }

    async fn put_snapshot(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Task join error: {}", e),
                    ErrorContext::new("put_snapshot").with_backend("file"),
                )
            })?
            .map_err(|e| self.io_error("put_snapshot", e))
    }

    async fn get_snapshot(&self) -> RepositoryResult<Option<Snapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error("get_snapshot", e)),
        };

        let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Stored snapshot is corrupt: {}", e),
                ErrorContext::new("get_snapshot")
                    .with_backend("file")
                    .with_details(format!("path={}", self.path.display())),
            )
        })?;
        Ok(Some(snapshot))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_missing_file_means_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().join("latest.json"));
        assert!(repo.get_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().join("nested/state/latest.json"));
        let at = Utc.with_ymd_and_hms(2025, 8, 5, 12, 0, 0).unwrap();
        let snapshot = Snapshot::new("timestamp,tmin\r\n2025-08-05T08:00:00-04:00,1.0\r\n", at);

        repo.put_snapshot(&snapshot).await.unwrap();
        assert_eq!(repo.get_snapshot().await.unwrap(), Some(snapshot));

        // Only the target remains; the temporary file was persisted over it
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("nested/state"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_second_put_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().join("latest.json"));
        let first = Snapshot::new("a", Utc.with_ymd_and_hms(2025, 8, 5, 12, 0, 0).unwrap());
        let second = Snapshot::new("b", Utc.with_ymd_and_hms(2025, 8, 5, 13, 0, 0).unwrap());

        repo.put_snapshot(&first).await.unwrap();
        repo.put_snapshot(&second).await.unwrap();

        let reopened = FileRepository::new(dir.path().join("latest.json"));
        assert_eq!(reopened.get_snapshot().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = FileRepository::new(&path).get_snapshot().await.unwrap_err();
        assert!(matches!(err, RepositoryError::InternalError { .. }));
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        std::fs::create_dir(&path).unwrap();

        let err = FileRepository::new(&path).get_snapshot().await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_failed_put_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupant"), b"x").unwrap();

        let snapshot = Snapshot::new("a", Utc.with_ymd_and_hms(2025, 8, 5, 12, 0, 0).unwrap());
        let err = FileRepository::new(&path)
            .put_snapshot(&snapshot)
            .await
            .unwrap_err();
        assert!(err.is_unavailable());

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("latest.json")]);
    }
}
