//! API error types.
//!
//! One classified error per failed request, carrying the underlying tool's
//! diagnostic text so the caller can tell which pipeline stage failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use ytclip_media::MediaError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid video duration")]
    DurationUnavailable,

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Download(_) | ApiError::DurationUnavailable => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Extraction(_) | ApiError::Publish(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::DownloadFailed { message } => ApiError::Download(message),
            MediaError::YtDlpNotFound => ApiError::Download(e.to_string()),
            MediaError::DurationUnavailable => ApiError::DurationUnavailable,
            MediaError::FfmpegFailed {
                message,
                stderr,
                exit_code,
            } => {
                let mut detail = message;
                if let Some(code) = exit_code {
                    detail.push_str(&format!(" (exit code {})", code));
                }
                if let Some(stderr) = stderr {
                    let stderr = stderr.trim();
                    if !stderr.is_empty() {
                        detail.push_str(": ");
                        detail.push_str(stderr);
                    }
                }
                ApiError::Extraction(detail)
            }
            MediaError::FfmpegNotFound => ApiError::Extraction(e.to_string()),
            MediaError::Cancelled | MediaError::Timeout(_) => ApiError::Cancelled,
            MediaError::FfprobeNotFound | MediaError::FileNotFound(_) | MediaError::Io(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}
