//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::parsing::ParseError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// A snapshot exists but holds no table
    NoData(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Upload without a CSV content type; carries the type received
    UnsupportedMediaType(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::NoData(msg) => (StatusCode::NOT_FOUND, ApiError::new("NO_DATA", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::UnsupportedMediaType(received) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    "UNSUPPORTED_MEDIA_TYPE",
                    "Forecast uploads must be sent as text/csv",
                )
                .with_details(format!("received content type: {}", received)),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => {
                let (status, code) = match &e {
                    RepositoryError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    RepositoryError::StorageUnavailable { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_UNAVAILABLE")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
                };
                (status, ApiError::new(code, e.to_string()))
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

/// A blank stored table is "no data". A reader failure on a table that was
/// accepted at upload is a server fault.
impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::EmptyInput => AppError::NoData(err.to_string()),
            ParseError::Malformed(_) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_no_data() {
        let response = AppError::from(ParseError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_reader_failure_is_internal_error() {
        let err = AppError::from(ParseError::Malformed("unexpected end of record".into()));
        assert!(matches!(&err, AppError::Internal(msg) if msg.contains("unexpected end")));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unavailable_storage_is_500() {
        let err = AppError::from(RepositoryError::unavailable("disk gone"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
