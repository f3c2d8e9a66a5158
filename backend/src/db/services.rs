//! High-level storage service layer.
//!
//! Repository-agnostic operations used by the HTTP handlers. They work with
//! any [`SnapshotRepository`] and add the logging and metadata bookkeeping
//! that should not differ between backends.
//!
//! # Usage
//!
//! ```no_run
//! use chrono::Utc;
//! use twilight_forecast::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let meta = services::store_snapshot(&repo, "timestamp,tmin\n".into(), Utc::now()).await?;
//!     println!("Stored {} bytes ({})", meta.size_bytes, meta.checksum);
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::repository::{RepositoryResult, SnapshotRepository};
use crate::models::{Snapshot, SnapshotMetadata};

// ==================== Health & Connection ====================

/// Check if the backing store is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: SnapshotRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Snapshot Operations ====================

/// Replace the stored snapshot with `raw`, stamped with `ingested_at`.
///
/// The body is stored verbatim; no validation happens here.
///
/// # Returns
/// * `Ok(SnapshotMetadata)` - Size and checksum of what was stored
/// * `Err` if the store cannot be written
pub async fn store_snapshot<R: SnapshotRepository + ?Sized>(
    repo: &R,
    raw: String,
    ingested_at: DateTime<Utc>,
) -> RepositoryResult<SnapshotMetadata> {
    let snapshot = Snapshot::new(raw, ingested_at);
    let metadata = snapshot.metadata();

    repo.put_snapshot(&snapshot).await?;

    info!(
        "Stored forecast snapshot: {} bytes, checksum {}, ingested at {} ({} backend)",
        metadata.size_bytes,
        metadata.checksum,
        metadata.ingested_at.to_rfc3339(),
        repo.backend_name()
    );

    Ok(metadata)
}

/// Read the current snapshot, if any.
pub async fn latest_snapshot<R: SnapshotRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Option<Snapshot>> {
    let snapshot = repo.get_snapshot().await?;
    match &snapshot {
        Some(s) => debug!(
            "Read forecast snapshot ({} bytes) from {} backend",
            s.raw.len(),
            repo.backend_name()
        ),
        None => debug!("No forecast snapshot stored in {} backend", repo.backend_name()),
    }
    Ok(snapshot)
}

/// Ingestion time of the current snapshot, `None` before the first upload.
pub async fn snapshot_timestamp<R: SnapshotRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Option<DateTime<Utc>>> {
    repo.get_ingested_at().await
}
