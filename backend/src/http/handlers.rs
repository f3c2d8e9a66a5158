//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the storage
//! service layer or the derivation services.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::dto::{ForecastMetadataResponse, ForecastSummary, HealthResponse, UploadResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::services::build_summary;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Header carrying the producer's own ingestion time (RFC 3339).
pub const UPLOAD_TIMESTAMP_HEADER: &str = "x-upload-timestamp";

/// Media types accepted for uploads, compared without parameters.
const CSV_MEDIA_TYPES: [&str; 2] = ["text/csv", "application/csv"];

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let storage = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.repository.backend_name().to_string(),
        storage,
    }))
}

// =============================================================================
// Upload
// =============================================================================

/// PUT /forecast (also POST /api/update)
///
/// Replace the stored table with the request body, verbatim.
pub async fn put_forecast(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<UploadResponse> {
    require_csv_content_type(&headers)?;

    let ingested_at = upload_timestamp(&headers).unwrap_or_else(Utc::now);
    let raw = String::from_utf8(body.to_vec())
        .map_err(|e| AppError::BadRequest(format!("Forecast table is not valid UTF-8: {}", e)))?;

    let metadata = db_services::store_snapshot(state.repository.as_ref(), raw, ingested_at).await?;

    Ok(Json(UploadResponse {
        message: "Forecast stored".to_string(),
        timestamp: metadata.ingested_at,
        size_bytes: metadata.size_bytes,
        checksum: metadata.checksum,
    }))
}

/// Reject anything that is not declared as CSV. Parameters such as
/// `charset` are ignored.
fn require_csv_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Err(AppError::UnsupportedMediaType("none".to_string()));
    };

    let declared = value.to_str().unwrap_or_default();
    let media_type = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if CSV_MEDIA_TYPES.contains(&media_type.as_str()) {
        Ok(())
    } else {
        Err(AppError::UnsupportedMediaType(declared.to_string()))
    }
}

/// Client-supplied ingestion time. An unparsable value is logged and ignored.
fn upload_timestamp(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let value = headers.get(UPLOAD_TIMESTAMP_HEADER)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc));

    if parsed.is_none() {
        warn!(
            "Ignoring invalid {} header {:?}; using receipt time",
            UPLOAD_TIMESTAMP_HEADER, value
        );
    }
    parsed
}

// =============================================================================
// Retrieval
// =============================================================================

/// GET /forecast
///
/// The stored table exactly as uploaded.
pub async fn get_forecast(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = db_services::latest_snapshot(state.repository.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("No forecast has been uploaded yet".to_string()))?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/csv; charset=utf-8"),
        )],
        snapshot.raw,
    )
        .into_response())
}

/// GET /forecast-metadata
///
/// Ingestion time of the stored table; `null` before the first upload.
pub async fn get_forecast_metadata(
    State(state): State<AppState>,
) -> HandlerResult<ForecastMetadataResponse> {
    let timestamp = db_services::snapshot_timestamp(state.repository.as_ref()).await?;
    Ok(Json(ForecastMetadataResponse { timestamp }))
}

/// GET /forecast-summary
///
/// Bands, night intervals, twilight values and freshness derived from the
/// stored table at request time.
pub async fn get_forecast_summary(
    State(state): State<AppState>,
) -> HandlerResult<ForecastSummary> {
    let snapshot = db_services::latest_snapshot(state.repository.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("No forecast has been uploaded yet".to_string()))?;

    let summary = build_summary(&snapshot, &state.config.observation, Utc::now())?;
    Ok(Json(summary))
}
