//! Repository trait for abstracting snapshot storage.
//!
//! The store holds exactly one slot: the latest raw forecast table and its
//! ingestion time. Each upload overwrites the slot wholesale.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Snapshot;

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for the single-slot snapshot store.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one instance can be shared across
/// request handlers.
///
/// # Consistency
/// `put_snapshot` must replace the raw table and its timestamp as one value;
/// a concurrent `get_snapshot` observes either the old pair or the new pair.
/// Concurrent writers are last-write-wins.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Overwrite the slot with a new snapshot.
    ///
    /// # Errors
    /// `RepositoryError::StorageUnavailable` if the store cannot be reached.
    async fn put_snapshot(&self, snapshot: &Snapshot) -> RepositoryResult<()>;

    /// Read the current snapshot.
    ///
    /// # Returns
    /// * `Ok(Some(Snapshot))` - The latest stored snapshot
    /// * `Ok(None)` - Nothing has ever been stored
    /// * `Err(RepositoryError)` - If the store cannot be read
    async fn get_snapshot(&self) -> RepositoryResult<Option<Snapshot>>;

    /// Read only the ingestion time of the current snapshot.
    async fn get_ingested_at(&self) -> RepositoryResult<Option<DateTime<Utc>>> {
        Ok(self.get_snapshot().await?.map(|s| s.ingested_at))
    }

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
