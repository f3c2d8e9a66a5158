//! The single stored forecast snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::checksum::calculate_checksum;

/// The raw forecast table together with its ingestion time.
///
/// Both fields are written and read as one value so that a reader can never
/// pair a new table with a stale timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub raw: String,
    pub ingested_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(raw: impl Into<String>, ingested_at: DateTime<Utc>) -> Self {
        Self {
            raw: raw.into(),
            ingested_at,
        }
    }

    /// Summary of the snapshot for logs and upload confirmations.
    pub fn metadata(&self) -> SnapshotMetadata {
        SnapshotMetadata {
            ingested_at: self.ingested_at,
            size_bytes: self.raw.len(),
            checksum: calculate_checksum(&self.raw),
        }
    }
}

/// Lightweight description of a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub ingested_at: DateTime<Utc>,
    pub size_bytes: usize,
    /// SHA-256 of the raw table, hex encoded
    pub checksum: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_reports_size_and_checksum() {
        let at = Utc.with_ymd_and_hms(2025, 8, 5, 12, 0, 0).unwrap();
        let snapshot = Snapshot::new("timestamp,tmin\n", at);
        let meta = snapshot.metadata();

        assert_eq!(meta.ingested_at, at);
        assert_eq!(meta.size_bytes, 15);
        assert_eq!(meta.checksum.len(), 64);
        assert_eq!(meta.checksum, calculate_checksum("timestamp,tmin\n"));
    }
}
