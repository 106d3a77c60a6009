//! Relay Error Types
//!
//! This module provides relay-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use crate::domain::transport::TransportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Relay-specific result type alias
pub type RelayResult<T> = Result<T, RelayError>;

/// Shown for every authorization failure so the cause stays hidden.
pub const FORBIDDEN_MESSAGE: &str = "This form cannot be submitted from here.";
pub const CAPTCHA_MESSAGE: &str = "Captcha is not valid.";
pub const MALFORMED_MESSAGE: &str = "Error occurred while submitting a form.";
pub const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Relay-specific error variants
#[derive(Debug, Error)]
pub enum RelayError {
    /// Token is not a hyphenated UUID or is unknown
    #[error("Token is not valid")]
    InvalidToken,

    /// Neither Referer nor Origin yields a hostname
    #[error("Request origin is not valid")]
    InvalidOrigin,

    /// Origin hostname is not on the owner's allow-list
    #[error("Domain is not allowed: {0}")]
    DomainNotAllowed(String),

    /// Captcha proof rejected, or missing while required
    #[error("Captcha is not valid")]
    CaptchaInvalid,

    /// Body could not be decoded, or a reserved field is unusable
    #[error("Malformed submission: {0}")]
    MalformedSubmission(String),

    /// Messaging transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidToken
            | RelayError::InvalidOrigin
            | RelayError::DomainNotAllowed(_) => StatusCode::FORBIDDEN,
            RelayError::CaptchaInvalid => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::MalformedSubmission(_) => StatusCode::BAD_REQUEST,
            RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            RelayError::Database(_) | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::InvalidToken
            | RelayError::InvalidOrigin
            | RelayError::DomainNotAllowed(_) => ErrorKind::Forbidden,
            RelayError::CaptchaInvalid => ErrorKind::UnprocessableEntity,
            RelayError::MalformedSubmission(_) => ErrorKind::BadRequest,
            RelayError::Transport(_) => ErrorKind::BadGateway,
            RelayError::Database(_) | RelayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to the submitting browser
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::InvalidToken
            | RelayError::InvalidOrigin
            | RelayError::DomainNotAllowed(_) => FORBIDDEN_MESSAGE,
            RelayError::CaptchaInvalid => CAPTCHA_MESSAGE,
            RelayError::MalformedSubmission(_) => MALFORMED_MESSAGE,
            RelayError::Transport(_) | RelayError::Database(_) | RelayError::Internal(_) => {
                INTERNAL_MESSAGE
            }
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            RelayError::Database(e) => {
                tracing::error!(error = %e, "Relay database error");
            }
            RelayError::Internal(msg) => {
                tracing::error!(message = %msg, "Relay internal error");
            }
            RelayError::Transport(e) => {
                tracing::warn!(error = %e, "Telegram transport error");
            }
            RelayError::DomainNotAllowed(domain) => {
                tracing::warn!(domain = %domain, "Submission from a domain that is not allowed");
            }
            RelayError::CaptchaInvalid => {
                tracing::warn!("Submission with an invalid captcha");
            }
            _ => {
                tracing::debug!(error = %self, "Submission rejected");
            }
        }
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        let kind = err.kind();
        let message = err.public_message();
        let app_err = AppError::new(kind, message);
        match err {
            RelayError::Database(e) => app_err.with_source(e),
            RelayError::Transport(e) => app_err.with_source(e),
            _ => app_err,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
