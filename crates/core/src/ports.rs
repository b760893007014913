//! Port interfaces for request execution
//!
//! These traits define the boundaries between the request pipeline and the
//! pieces it does not own: the network primitive and value validators.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use courier_domain::{
    ErrorCause, Headers, HttpMethod, RequestError, ResponseHandle, ValidationOutcome,
};
use serde_json::Value;
use thiserror::Error;

/// Request body in wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedBody {
    Text(String),
    Bytes(Bytes),
    /// URL-encoded by the transport.
    Form(Vec<(String, String)>),
}

/// A single exchange handed to the [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<SerializedBody>,
    /// Per-exchange deadline. The executor enforces it as well.
    pub timeout: Option<Duration>,
}

/// Why an exchange produced no response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("{message}")]
    Failure {
        message: String,
        #[source]
        cause: ErrorCause,
    },
}

impl TransportError {
    pub fn failure<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Failure { message: message.into(), cause: Arc::new(cause) }
    }
}

/// Trait for performing a single HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and buffer the full response.
    ///
    /// Non-success statuses are responses, not errors.
    async fn send(&self, request: TransportRequest) -> Result<ResponseHandle, TransportError>;
}

/// Trait for validating (and optionally transforming) a value
#[async_trait]
pub trait Schema: Send + Sync {
    /// `Err` is reserved for failures of the validator itself; rejected
    /// values are reported through [`ValidationOutcome::Failure`].
    async fn validate(&self, value: Value) -> Result<ValidationOutcome, RequestError>;
}
