//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping internal errors to appropriate HTTP status codes.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use notewise_core::error::NotewiseError;
use notewise_insight::InsightError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "internal_error").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 413 Payload Too Large - upload exceeds the body limit.
    PayloadTooLarge(String),
    /// 422 Unprocessable Entity - the file was accepted but could not be read.
    UnprocessableEntity(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg),
            ApiError::UnprocessableEntity(msg) => ("unprocessable_entity", msg),
            ApiError::Internal(msg) => ("internal_error", msg),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, message = %message, "Request failed");
        }

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<NotewiseError> for ApiError {
    fn from(err: NotewiseError) -> Self {
        match err {
            NotewiseError::InvalidArgument(msg) | NotewiseError::Config(msg) => {
                ApiError::BadRequest(msg)
            }
            NotewiseError::UnsupportedFile(msg) => {
                ApiError::BadRequest(format!("Unsupported file type: {}", msg))
            }
            NotewiseError::Extraction(msg) => ApiError::UnprocessableEntity(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            InsightError::Serialization(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorBody) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, body) = body_of(ApiError::BadRequest("No file part".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "bad_request");
        assert_eq!(body.message, "No file part");
    }

    #[tokio::test]
    async fn test_invalid_argument_maps_to_400() {
        let err: ApiError = InsightError::InvalidArgument("unknown length".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = NotewiseError::InvalidArgument("format".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_collaborator_errors_map_to_500() {
        let err: ApiError = NotewiseError::Transcription("model missing".to_string()).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "internal_error");
        assert!(body.message.contains("model missing"));
    }

    #[tokio::test]
    async fn test_extraction_maps_to_422() {
        let err: ApiError = NotewiseError::Extraction("bad docx".to_string()).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unsupported_file_maps_to_400() {
        let err: ApiError = NotewiseError::UnsupportedFile("exe".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("exe")));
    }
}
