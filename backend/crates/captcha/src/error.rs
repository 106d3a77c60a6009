//! Captcha Error Types
//!
//! This module provides captcha-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Captcha-specific result type alias
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Captcha-specific error variants
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Proof is not base64 JSON of the expected shape
    #[error("Malformed captcha payload")]
    MalformedPayload,

    /// Proof names a hash algorithm this server never issues
    #[error("Unsupported captcha algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Salt carries no usable expiry
    #[error("Captcha salt has no valid expiry")]
    MissingExpiry,

    /// Salt expiry is in the past
    #[error("Captcha expired")]
    Expired,

    /// Number above the issued bound
    #[error("Captcha number out of range")]
    NumberOutOfRange,

    /// Hash or signature does not match the recomputed challenge
    #[error("Captcha solution does not match")]
    Mismatch,

    /// Server misconfiguration
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptchaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CaptchaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptchaError::Internal(_) => ErrorKind::InternalServerError,
            _ => ErrorKind::UnprocessableEntity,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            CaptchaError::Internal(msg) => {
                tracing::error!(message = %msg, "Captcha internal error");
            }
            CaptchaError::Mismatch | CaptchaError::NumberOutOfRange => {
                tracing::warn!(error = %self, "Captcha forgery attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Captcha rejected");
            }
        }
    }
}

impl From<CaptchaError> for AppError {
    fn from(err: CaptchaError) -> Self {
        let kind = err.kind();
        match err {
            // Never echo internal detail to the client.
            CaptchaError::Internal(_) => AppError::new(kind, "Captcha is unavailable"),
            other => AppError::new(kind, other.to_string()),
        }
    }
}

impl IntoResponse for CaptchaError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
