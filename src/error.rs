//! Relay error taxonomy
//!
//! Every failure the relay can report is one of the [`RelayError`] variants.
//! They render as a single-element `errors` envelope and always carry HTTP 200;
//! callers tell success from failure by the envelope shape alone.

use crate::hibp::client::UpstreamError;
use crate::utils::response_handler::ResponseHandler;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const AUTH_FAILED_MESSAGE: &str = "Failed to decode JWT with provided key";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Service temporarily unavailable. Please try again later.";
pub const OOPS_MESSAGE: &str = "Something went wrong.";

/// Closed set of error codes surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthorizationFailed,
    AccessDenied,
    TooManyRequests,
    ServiceUnavailable,
    Oops,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthorizationFailed => "authorization failed",
            ErrorCode::AccessDenied => "access denied",
            ErrorCode::TooManyRequests => "too many requests",
            ErrorCode::ServiceUnavailable => "service unavailable",
            ErrorCode::Oops => "oops",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Every canonical error is fatal for the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Fatal,
}

/// The `{code, message, type}` triple reported inside `errors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
}

/// Relay-level errors, one per canonical code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{}", SERVICE_UNAVAILABLE_MESSAGE)]
    ServiceUnavailable,

    #[error("{}", OOPS_MESSAGE)]
    Oops,
}

impl RelayError {
    /// Token gate failure; the decode reason is never exposed to the caller
    pub fn authorization_failed() -> Self {
        RelayError::AuthorizationFailed(AUTH_FAILED_MESSAGE.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::AuthorizationFailed(_) => ErrorCode::AuthorizationFailed,
            RelayError::AccessDenied(_) => ErrorCode::AccessDenied,
            RelayError::TooManyRequests(_) => ErrorCode::TooManyRequests,
            RelayError::ServiceUnavailable => ErrorCode::ServiceUnavailable,
            RelayError::Oops => ErrorCode::Oops,
        }
    }

    pub fn to_canonical(&self) -> CanonicalError {
        CanonicalError {
            code: self.code(),
            message: self.to_string(),
            error_type: ErrorType::Fatal,
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::Timeout | UpstreamError::Connect(_) => RelayError::ServiceUnavailable,
            UpstreamError::InvalidHeader(_) | UpstreamError::Request(_) => RelayError::Oops,
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        ResponseHandler::failure(self)
    }
}
