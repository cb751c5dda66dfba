//! Error types for songbook-server
//!
//! Every handler failure becomes a JSON body `{ "error": ..., "details"?: ... }`.
//! Internal failures are logged and never echo their cause to the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use songbook_common::Error;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("{error}: {details}")]
    BadRequest { error: String, details: String },

    /// No record at the given id (404)
    #[error("{0}")]
    NotFound(String),

    /// Store or aggregation failure (500)
    #[error("{error}: {source}")]
    Internal { error: String, source: Error },
}

impl ApiError {
    /// Classify a data-layer error under an operation-specific message
    pub fn from_common(context: &str, err: Error) -> Self {
        match err {
            Error::Validation(details) => ApiError::BadRequest {
                error: context.to_string(),
                details,
            },
            Error::NotFound(_) => ApiError::NotFound("Song not found".to_string()),
            other => ApiError::Internal {
                error: context.to_string(),
                source: other,
            },
        }
    }

    /// Unreadable request body
    pub fn rejected(context: &str, rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            error: context.to_string(),
            details: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest { error, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error, details: Some(details) },
            ),
            ApiError::NotFound(error) => (StatusCode::NOT_FOUND, ErrorBody { error, details: None }),
            ApiError::Internal { error, source } => {
                error!("{}: {}", error, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { error, details: None },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Attach an operation message to data-layer results
pub trait ApiContext<T> {
    fn api_context(self, context: &str) -> ApiResult<T>;
}

impl<T> ApiContext<T> for songbook_common::Result<T> {
    fn api_context(self, context: &str) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_common(context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = ApiError::from_common("Failed to create song", Error::Validation("title is required".into()));
        assert!(matches!(err, ApiError::BadRequest { .. }));

        let err = ApiError::from_common("Failed to update song", Error::NotFound("song 1".into()));
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Song not found"));

        let err = ApiError::from_common("Failed to generate statistics", Error::Aggregation("boom".into()));
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[test]
    fn test_status_codes() {
        let response = ApiError::NotFound("Song not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::from_common("Failed to fetch songs", Error::Config("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
