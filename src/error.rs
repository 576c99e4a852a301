//! Error types for evalkit
//!
//! Every API call returns `Result<T, Error>` where [`Error`] carries a closed
//! [`ErrorKind`] for pattern matching plus whatever detail the server sent.
//! Client construction failures live in [`crate::config::ConfigError`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Closed taxonomy of API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 400, and any status without a dedicated kind
    BadRequest,
    /// 401
    Authentication,
    /// 403
    PermissionDenied,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 422
    UnprocessableEntity,
    /// 429
    RateLimit,
    /// 5xx
    ServerError,
    /// Transport timeout
    Timeout,
    /// Connection failure or any other transport fault
    Connection,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::BadRequest,
        ErrorKind::Authentication,
        ErrorKind::PermissionDenied,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::UnprocessableEntity,
        ErrorKind::RateLimit,
        ErrorKind::ServerError,
        ErrorKind::Timeout,
        ErrorKind::Connection,
    ];

    /// Snake-case name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Authentication => "authentication",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::UnprocessableEntity => "unprocessable_entity",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
        }
    }

    /// Whether a caller may reasonably retry an error of this kind
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Conflict
                | ErrorKind::RateLimit
                | ErrorKind::ServerError
                | ErrorKind::Timeout
                | ErrorKind::Connection
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API error
///
/// Immutable once built. `retry_after_ms` is only present when the server
/// sent a usable `Retry-After` hint. Transport faults that are neither a
/// timeout nor a connection failure are reported as `Connection` but flagged
/// unexpected, and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    status: Option<u16>,
    retry_after_ms: Option<u64>,
    unexpected: bool,
}

impl Error {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            status: None,
            retry_after_ms: None,
            unexpected: false,
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Create a connection error for an unclassified transport fault
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            unexpected: true,
            ..Self::connection(message)
        }
    }

    /// Attach an application error code
    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Attach the HTTP status that produced this error
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a server-supplied retry delay
    #[must_use]
    pub fn with_retry_after_ms(mut self, retry_after_ms: Option<u64>) -> Self {
        self.retry_after_ms = retry_after_ms;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status, absent for transport failures
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        self.retry_after_ms
    }

    /// Whether this came from an unclassified transport fault
    pub fn is_unexpected(&self) -> bool {
        self.unexpected
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !self.unexpected
    }
}

/// Result type alias for evalkit
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::new(ErrorKind::NotFound, "Project not found");
        assert_eq!(err.to_string(), "not_found: Project not found");

        let err = Error::timeout("Request timed out");
        assert_eq!(err.to_string(), "timeout: Request timed out");
    }

    #[test]
    fn test_builder_fields() {
        let err = Error::new(ErrorKind::RateLimit, "slow down")
            .with_status(429)
            .with_code(Some("rate_limited".to_string()))
            .with_retry_after_ms(Some(5000));

        assert_eq!(err.kind(), ErrorKind::RateLimit);
        assert_eq!(err.message(), "slow down");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), Some("rate_limited"));
        assert_eq!(err.retry_after_ms(), Some(5000));
    }

    #[test]
    fn test_transport_errors_have_no_status() {
        let err = Error::connection("Connection error: refused");
        assert_eq!(err.status(), None);
        assert_eq!(err.retry_after_ms(), None);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_unexpected_fault_is_connection_but_not_retryable() {
        let err = Error::unexpected("Unexpected error: builder error");
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.is_unexpected());
        assert!(!err.is_retryable());
        assert!(!Error::connection("refused").is_unexpected());
    }

    #[test_case(ErrorKind::BadRequest, false)]
    #[test_case(ErrorKind::Authentication, false)]
    #[test_case(ErrorKind::PermissionDenied, false)]
    #[test_case(ErrorKind::NotFound, false)]
    #[test_case(ErrorKind::Conflict, true)]
    #[test_case(ErrorKind::UnprocessableEntity, false)]
    #[test_case(ErrorKind::RateLimit, true)]
    #[test_case(ErrorKind::ServerError, true)]
    #[test_case(ErrorKind::Timeout, true)]
    #[test_case(ErrorKind::Connection, true)]
    fn test_is_retryable(kind: ErrorKind, expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
        assert_eq!(Error::new(kind, "x").is_retryable(), expected);
    }

    #[test]
    fn test_kind_names_are_snake_case() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }
}
