//! Error types used throughout Courier

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::constants::{
    CALLBACK_VALIDATION_PREFIX, GENERIC_VALIDATION_PREFIX, HEADER_VALIDATION_PREFIX,
    UNKNOWN_VALIDATION_ERROR,
};
use crate::types::{HttpErrorBody, Issue, ResponseHandle, RetryPolicy};

/// Shared, cloneable handle to the underlying failure of a network exchange.
pub type ErrorCause = Arc<dyn StdError + Send + Sync>;

/// Discriminant of [`RequestError`], used for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    Http,
    RetryExhausted,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Http => "http",
            Self::RetryExhausted => "retry_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a request can fail, as observed by the caller.
///
/// Instances are built at the point of failure and are never mutated
/// afterwards; [`RequestError::prefixed`] returns a new value.
#[derive(Error, Debug, Clone)]
pub enum RequestError {
    /// A value failed schema validation (request body, response body or
    /// callback result).
    #[error("{message}")]
    Validation { message: String, issues: Vec<Issue> },

    /// The exchange could not complete. Timeouts are reported separately.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        cause: ErrorCause,
    },

    /// The exchange exceeded its per-attempt deadline.
    #[error("{message}")]
    Timeout { message: String, timeout_ms: u64 },

    /// The exchange completed with a non-success status.
    ///
    /// `data` is only present when an error schema was supplied and the body
    /// validated against it.
    #[error("{message}")]
    Http {
        message: String,
        status: u16,
        status_text: String,
        response: ResponseHandle,
        data: Option<Value>,
    },

    /// The retry loop ran out of attempts without an error to report.
    #[error("{message}")]
    RetryExhausted {
        message: String,
        attempts: u32,
        #[source]
        last_error: Option<Box<RequestError>>,
    },
}

impl RequestError {
    pub fn validation(message: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self::Validation { message: message.into(), issues }
    }

    /// Validation failure carrying the schema's issues.
    pub fn validation_failed(issues: Vec<Issue>) -> Self {
        let message = if issues.is_empty() {
            GENERIC_VALIDATION_PREFIX.to_string()
        } else {
            format!("{GENERIC_VALIDATION_PREFIX}: {}", Issue::summarize(&issues))
        };
        Self::Validation { message, issues }
    }

    /// A header that cannot be sent. Raised before any exchange.
    pub fn invalid_header(err: &HeaderError) -> Self {
        Self::Validation {
            message: format!("{HEADER_VALIDATION_PREFIX}: {err}"),
            issues: vec![Issue::at(["headers", err.name()], err.to_string())],
        }
    }

    /// Fallback raised when a validator produced neither a value nor issues.
    pub fn unknown_validation() -> Self {
        Self::Validation { message: UNKNOWN_VALIDATION_ERROR.to_string(), issues: Vec::new() }
    }

    pub fn network<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Network { message: message.into(), cause: Arc::new(cause) }
    }

    pub fn network_with_cause(message: impl Into<String>, cause: ErrorCause) -> Self {
        Self::Network { message: message.into(), cause }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { message: format!("Request timed out after {timeout_ms}ms"), timeout_ms }
    }

    /// Build an HTTP error from a completed non-success response.
    pub fn http(response: ResponseHandle, data: Option<Value>) -> Self {
        let status = response.status();
        let status_text = response.status_text().to_string();
        let message = if status_text.is_empty() {
            format!("Request failed with status {status}")
        } else {
            format!("Request failed with status {status} {status_text}")
        };
        Self::Http { message, status, status_text, response, data }
    }

    pub fn retry_exhausted(attempts: u32, last_error: Option<RequestError>) -> Self {
        Self::RetryExhausted {
            message: format!("All {attempts} retry attempts exhausted"),
            attempts,
            last_error: last_error.map(Box::new),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::RetryExhausted { .. } => ErrorKind::RetryExhausted,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Network { message, .. }
            | Self::Timeout { message, .. }
            | Self::Http { message, .. }
            | Self::RetryExhausted { message, .. } => message,
        }
    }

    /// Validation issues, empty for every other kind.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Validation { issues, .. } => issues,
            _ => &[],
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Re-label a validation error with the stage it was raised in.
    ///
    /// Non-validation errors are returned unchanged.
    pub fn prefixed(self, prefix: &str) -> Self {
        match self {
            Self::Validation { message, issues } => {
                let detail = if issues.is_empty() { message } else { Issue::summarize(&issues) };
                Self::Validation { message: format!("{prefix}: {detail}"), issues }
            }
            other => other,
        }
    }

    /// Whether this error came from re-validating a callback's own result.
    /// Such errors always escape to the caller.
    pub fn is_callback_result_validation(&self) -> bool {
        matches!(self, Self::Validation { message, .. } if message.starts_with(CALLBACK_VALIDATION_PREFIX))
    }

    /// Retry eligibility under `policy`: HTTP errors with a listed status and
    /// every network error.
    pub fn is_retryable_by(&self, policy: &RetryPolicy) -> bool {
        match self {
            Self::Http { status, .. } => policy.is_retryable_status(*status),
            Self::Network { .. } => true,
            Self::Validation { .. } | Self::Timeout { .. } | Self::RetryExhausted { .. } => false,
        }
    }

    /// Payload for the `on_http_error` slot: the validated body when one is
    /// available, the raw response otherwise.
    pub fn http_body(&self) -> Option<HttpErrorBody> {
        match self {
            Self::Http { data: Some(data), .. } => Some(HttpErrorBody::Validated(data.clone())),
            Self::Http { response, .. } => Some(HttpErrorBody::Raw(response.clone())),
            _ => None,
        }
    }

    /// JSON summary of the error.
    pub fn into_value(self) -> Value {
        let kind = self.kind().as_str();
        match self {
            Self::Validation { message, issues } => {
                json!({ "kind": kind, "message": message, "issues": issues })
            }
            Self::Network { message, cause } => {
                json!({ "kind": kind, "message": message, "cause": cause.to_string() })
            }
            Self::Timeout { message, timeout_ms } => {
                json!({ "kind": kind, "message": message, "timeout_ms": timeout_ms })
            }
            Self::Http { message, status, status_text, data, .. } => json!({
                "kind": kind,
                "message": message,
                "status": status,
                "status_text": status_text,
                "data": data,
            }),
            Self::RetryExhausted { message, attempts, last_error } => json!({
                "kind": kind,
                "message": message,
                "attempts": attempts,
                "last_error": last_error.map(|err| err.into_value()),
            }),
        }
    }
}

/// A header name or value that is not valid on the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("invalid header name {name:?}")]
    InvalidName { name: String },

    /// The value itself is never included; it may be a credential.
    #[error("invalid value for header {name}")]
    InvalidValue { name: String },
}

impl HeaderError {
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidName { name } | Self::InvalidValue { name } => name,
        }
    }
}

/// Errors raised while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration header: {0}")]
    Header(#[from] HeaderError),
}

/// Result type alias for request operations
pub type Result<T> = std::result::Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, status_text: &str) -> ResponseHandle {
        ResponseHandle::new(status, status_text, "http://localhost/test", Default::default(), "")
    }

    #[test]
    fn prefixed_rewrites_validation_messages() {
        let err = RequestError::validation_failed(vec![Issue::at(["name"], "expected string")])
            .prefixed(CALLBACK_VALIDATION_PREFIX);

        assert_eq!(err.message(), "Callback result validation failed: name: expected string");
        assert!(err.is_callback_result_validation());
    }

    #[test]
    fn prefixed_keeps_message_without_issues() {
        let err = RequestError::unknown_validation().prefixed("Input validation failed");
        assert_eq!(err.message(), "Input validation failed: Unknown validation error");
        assert!(!err.is_callback_result_validation());
    }

    #[test]
    fn prefixed_leaves_other_kinds_alone() {
        let err = RequestError::timeout(250).prefixed("Input validation failed");
        assert_eq!(err.message(), "Request timed out after 250ms");
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn retry_eligibility_follows_policy() {
        let policy = RetryPolicy::default();

        assert!(RequestError::http(response(503, "Service Unavailable"), None)
            .is_retryable_by(&policy));
        assert!(!RequestError::http(response(404, "Not Found"), None).is_retryable_by(&policy));
        assert!(RequestError::network("connection reset", std::io::Error::other("reset"))
            .is_retryable_by(&policy));
        assert!(!RequestError::timeout(10).is_retryable_by(&policy));
        assert!(!RequestError::validation_failed(Vec::new()).is_retryable_by(&policy));
    }

    #[test]
    fn http_body_prefers_validated_data() {
        let validated = RequestError::http(response(400, "Bad Request"), Some(json!({"code": 7})));
        assert_eq!(validated.http_body(), Some(HttpErrorBody::Validated(json!({"code": 7}))));

        let raw = RequestError::http(response(400, "Bad Request"), None);
        match raw.http_body() {
            Some(HttpErrorBody::Raw(handle)) => {
                assert_eq!(handle.status(), 400);
                assert_eq!(handle.status_text(), "Bad Request");
            }
            other => panic!("expected raw body, got {other:?}"),
        }

        assert!(RequestError::timeout(1).http_body().is_none());
    }

    #[test]
    fn http_message_includes_status_text() {
        let err = RequestError::http(response(500, "Internal Server Error"), None);
        assert_eq!(err.to_string(), "Request failed with status 500 Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn into_value_summarizes_error() {
        let value = RequestError::timeout(1500).into_value();
        assert_eq!(value["kind"], "timeout");
        assert_eq!(value["timeout_ms"], 1500);

        let nested = RequestError::retry_exhausted(0, None).into_value();
        assert_eq!(nested["kind"], "retry_exhausted");
        assert!(nested["last_error"].is_null());
    }

    #[test]
    fn invalid_header_is_validation_without_value() {
        let err = RequestError::invalid_header(&HeaderError::InvalidValue {
            name: "authorization".into(),
        });

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.message(),
            "Request header validation failed: invalid value for header authorization"
        );
        assert_eq!(err.issues()[0].path_string().as_deref(), Some("headers.authorization"));
        assert!(!err.is_retryable_by(&RetryPolicy::default()));
    }

    #[test]
    fn network_error_exposes_source() {
        let err = RequestError::network("dns failure", std::io::Error::other("no such host"));
        let source = StdError::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("no such host"));
    }
}
