//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use blog_core::{ErrorCode, ServiceError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    InvalidArgument(String),
    NotFound(String),
    FailedPrecondition(String),
    Internal(String),
    StreamAborted(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::FailedPrecondition(_) => ErrorCode::FailedPrecondition,
            AppError::Internal(_) => ErrorCode::Internal,
            AppError::StreamAborted(_) => ErrorCode::StreamAborted,
        }
    }

    /// Problem body for this error.
    pub fn problem(&self) -> ErrorResponse {
        let error = match self {
            AppError::InvalidArgument(detail) => ErrorResponse::bad_request(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::FailedPrecondition(detail) => ErrorResponse::precondition_failed(detail),
            AppError::Internal(detail) | AppError::StreamAborted(detail) => {
                // Log internal errors
                tracing::error!(code = %self.code(), "Internal error: {}", detail);
                ErrorResponse::internal_error().with_detail(detail)
            }
        };

        error.with_code(self.code().as_str())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::FailedPrecondition(msg) => write!(f, "Failed precondition: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::StreamAborted(msg) => write!(f, "Stream aborted: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
            AppError::Internal(_) | AppError::StreamAborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

// Conversion from service errors
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let detail = err.to_string();
        match err.code() {
            ErrorCode::InvalidArgument => AppError::InvalidArgument(detail),
            ErrorCode::NotFound => AppError::NotFound(detail),
            ErrorCode::FailedPrecondition => AppError::FailedPrecondition(detail),
            ErrorCode::Internal => AppError::Internal(detail),
            ErrorCode::StreamAborted => AppError::StreamAborted(detail),
        }
    }
}

/// Render malformed JSON bodies as `INVALID_ARGUMENT` problems.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidArgument(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
