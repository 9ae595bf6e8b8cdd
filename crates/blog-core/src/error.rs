//! Error types and the translation from store outcomes to caller-facing errors.

use std::fmt;

use thiserror::Error;

use crate::domain::{BlogId, MalformedIdentifier};

/// Store-level faults. Every variant means the backend could not be relied on
/// for this call; absence and failed preconditions are outcomes, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store request failed: {0}")]
    Query(String),

    #[error("Malformed store response: {0}")]
    Malformed(String),
}

/// Stable error codes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Internal,
    StreamAborted,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::StreamAborted => "STREAM_ABORTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing errors returned by [`crate::BlogService`].
///
/// The message is free text for humans; callers should match on [`ServiceError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    FailedPrecondition(String),

    #[error("{0}")]
    Internal(String),

    /// List stopped partway; items already delivered stand.
    #[error("{detail} (after {delivered} posts)")]
    StreamAborted { delivered: usize, detail: String },
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::FailedPrecondition(_) => ErrorCode::FailedPrecondition,
            ServiceError::Internal(_) => ErrorCode::Internal,
            ServiceError::StreamAborted { .. } => ErrorCode::StreamAborted,
        }
    }

    pub(crate) fn not_found(id: &BlogId) -> Self {
        ServiceError::NotFound(format!("Could not find blog in store for key: {id}"))
    }

    pub(crate) fn update_precondition(id: &BlogId) -> Self {
        ServiceError::FailedPrecondition(format!(
            "Could not update blog {id}: conditional write requires an existing record"
        ))
    }

    /// Translate a store fault raised while performing `action`.
    pub(crate) fn store_fault(action: &str, err: StoreError) -> Self {
        tracing::error!(action, error = %err, "Store fault");
        ServiceError::Internal(format!("Could not {action}: {err}"))
    }

    pub(crate) fn scan_aborted(delivered: usize, err: StoreError) -> Self {
        tracing::error!(delivered, error = %err, "Store scan failed mid-stream");
        ServiceError::StreamAborted {
            delivered,
            detail: format!("Failed to paginate store scan: {err}"),
        }
    }
}

impl From<MalformedIdentifier> for ServiceError {
    fn from(err: MalformedIdentifier) -> Self {
        ServiceError::InvalidArgument(format!(
            "Blog ID provided does not match UUIDv4 format: {err}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let cases = [
            (ServiceError::InvalidArgument("x".into()), "INVALID_ARGUMENT"),
            (ServiceError::NotFound("x".into()), "NOT_FOUND"),
            (ServiceError::FailedPrecondition("x".into()), "FAILED_PRECONDITION"),
            (ServiceError::Internal("x".into()), "INTERNAL"),
            (
                ServiceError::StreamAborted {
                    delivered: 3,
                    detail: "x".into(),
                },
                "STREAM_ABORTED",
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.code().as_str(), code);
        }
    }

    #[test]
    fn test_malformed_identifier_is_invalid_argument() {
        let err: ServiceError = BlogId::parse("FORCEANERROR").unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.to_string().contains("FORCEANERROR"));
    }

    #[test]
    fn test_store_fault_is_internal() {
        let err = ServiceError::store_fault(
            "get blog from store",
            StoreError::Connection("refused".into()),
        );
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(err.to_string().contains("refused"));
    }
}
