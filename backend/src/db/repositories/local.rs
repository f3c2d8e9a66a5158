//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. The slot lives behind a
//! lock, so a put replaces the table and its timestamp in one step.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::Snapshot;

/// In-memory local repository.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use twilight_forecast::db::repositories::LocalRepository;
/// use twilight_forecast::db::repository::SnapshotRepository;
/// use twilight_forecast::models::Snapshot;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.put_snapshot(&Snapshot::new("timestamp\n", Utc::now())).await.unwrap();
///     assert!(repo.get_snapshot().await.unwrap().is_some());
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    snapshot: Option<Snapshot>,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            snapshot: None,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository already holding `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let repo = Self::new();
        repo.data.write().snapshot = Some(snapshot);
        repo
    }

    /// Set the health status for testing storage failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear the stored snapshot.
    pub fn clear(&self) {
        self.data.write().snapshot = None;
    }

    /// Check if a snapshot is stored.
    pub fn has_snapshot(&self) -> bool {
        self.data.read().snapshot.is_some()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::unavailable_with_context(
                "Local store is not healthy",
                ErrorContext::new(operation).with_backend("local"),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn put_snapshot(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        self.check_health("put_snapshot")?;
        self.data.write().snapshot = Some(snapshot.clone());
        Ok(())
    }

    async fn get_snapshot(&self) -> RepositoryResult<Option<Snapshot>> {
        self.check_health("get_snapshot")?;
        Ok(self.data.read().snapshot.clone())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(raw: &str, hour: u32) -> Snapshot {
        Snapshot::new(raw, Utc.with_ymd_and_hms(2025, 8, 5, hour, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_empty_repository_returns_none() {
        let repo = LocalRepository::new();
        assert!(repo.get_snapshot().await.unwrap().is_none());
        assert!(repo.get_ingested_at().await.unwrap().is_none());
        assert!(!repo.has_snapshot());
    }

    #[tokio::test]
    async fn test_put_overwrites_slot() {
        let repo = LocalRepository::new();
        repo.put_snapshot(&snapshot("first", 10)).await.unwrap();
        repo.put_snapshot(&snapshot("second", 11)).await.unwrap();

        let stored = repo.get_snapshot().await.unwrap().unwrap();
        assert_eq!(stored, snapshot("second", 11));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_is_unavailable() {
        let repo = LocalRepository::with_snapshot(snapshot("table", 10));
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.get_snapshot().await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.context().operation.as_deref(), Some("get_snapshot"));

        let err = repo.put_snapshot(&snapshot("new", 11)).await.unwrap_err();
        assert!(err.is_unavailable());

        repo.set_healthy(true);
        assert_eq!(
            repo.get_snapshot().await.unwrap().unwrap().raw,
            "table"
        );
    }

    #[tokio::test]
    async fn test_clear_empties_slot() {
        let repo = LocalRepository::with_snapshot(snapshot("table", 10));
        repo.clear();
        assert!(repo.get_snapshot().await.unwrap().is_none());
    }
}
