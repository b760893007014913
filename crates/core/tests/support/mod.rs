//! Shared test helpers for `courier-core` integration tests.
//!
//! [`ScriptedTransport`] replays a fixed sequence of outcomes and records
//! every request it receives, so pipeline tests can assert on exchange counts
//! without a network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use courier_core::{Transport, TransportError, TransportRequest};
use courier_domain::{HeaderName, HeaderValue, Headers, ResponseHandle};
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(ResponseHandle),
    Fail(TransportError),
    /// Never completes; only a deadline ends the exchange.
    Hang,
}

/// In-memory [`Transport`] that plays back [`Step`]s in order.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    /// Transport that answers its first call with `status` and a JSON body.
    pub fn responding(status: u16, body: Value) -> Self {
        Self::new([Step::Respond(json_response(status, body))])
    }

    pub fn shared(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }

    /// Number of exchanges attempted so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<ResponseHandle, TransportError> {
        let url = request.url.clone();
        self.requests.lock().push(request);

        let step = self.steps.lock().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportError::failure(
                format!("no scripted response for {url}"),
                std::io::Error::other("script exhausted"),
            )),
        }
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// Route pipeline logs to the test harness. Filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn content_type(value: &'static str) -> Headers {
    let mut headers = Headers::new();
    headers.insert(HeaderName::from_static("content-type"), HeaderValue::from_static(value));
    headers
}

pub fn json_response(status: u16, body: Value) -> ResponseHandle {
    let headers = content_type("application/json");
    ResponseHandle::new(status, status_text(status), "http://scripted.test/", headers, body.to_string())
}

pub fn text_response(status: u16, body: &str) -> ResponseHandle {
    let headers = content_type("text/plain");
    ResponseHandle::new(status, status_text(status), "http://scripted.test/", headers, body.to_string())
}

pub fn connection_refused() -> TransportError {
    TransportError::failure(
        "connection refused",
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
    )
}
