//! Data Transfer Objects for the HTTP API.
//!
//! The summary endpoint serializes [`ForecastSummary`] directly; the types
//! below cover the remaining endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::ForecastSummary;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the crate serving the API
    pub version: String,
    /// Storage backend name
    pub backend: String,
    /// Storage status
    pub storage: String,
}

/// Confirmation returned after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// Ingestion time recorded for the snapshot
    pub timestamp: DateTime<Utc>,
    pub size_bytes: usize,
    /// SHA-256 of the stored table, hex encoded
    pub checksum: String,
}

/// Response of `GET /forecast-metadata`.
///
/// `timestamp` is `null` until the first upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastMetadataResponse {
    pub timestamp: Option<DateTime<Utc>>,
}
