//! Request executor
//!
//! Runs a resolved request through the transport, enforces the per-attempt
//! deadline, and classifies failed exchanges into [`RequestError`]s.

use std::sync::Arc;
use std::time::Duration;

use courier_domain::{RequestError, ResponseHandle, Result};
use tracing::{debug, instrument};

use crate::ports::{Schema, Transport, TransportError};
use crate::request::RequestDescriptor;
use crate::retry;
use crate::validation;

/// Executes descriptors against a [`Transport`].
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute the exchange, retrying under the descriptor's policy if it
    /// has one. Only 2xx responses are returned as `Ok`.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, url = %descriptor.url))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<ResponseHandle> {
        match &descriptor.retry {
            Some(policy) => {
                retry::with_retry(policy, |attempt| self.execute_once(descriptor, attempt)).await
            }
            None => self.execute_once(descriptor, 1).await,
        }
    }

    async fn execute_once(
        &self,
        descriptor: &RequestDescriptor,
        attempt: u32,
    ) -> Result<ResponseHandle> {
        debug!(attempt, method = %descriptor.method, url = %descriptor.url, "Sending request");

        let request = descriptor.transport_request();
        let outcome = match descriptor.timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.transport.send(request))
                .await
                .unwrap_or(Err(TransportError::Timeout)),
            None => self.transport.send(request).await,
        };

        let response = outcome.map_err(|err| transport_error(err, descriptor.timeout))?;
        debug!(attempt, status = response.status(), "Received response");

        if response.is_success() {
            return Ok(response);
        }
        Err(http_error(response, descriptor.error_schema.as_deref()).await?)
    }
}

fn transport_error(error: TransportError, timeout: Option<Duration>) -> RequestError {
    match error {
        TransportError::Timeout => {
            let timeout_ms = timeout.map_or(0, |timeout| {
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
            });
            RequestError::timeout(timeout_ms)
        }
        TransportError::Failure { message, cause } => RequestError::network_with_cause(message, cause),
    }
}

/// Build the HTTP error for a non-2xx response.
///
/// With an error schema the body is parsed and validated; a body that is not
/// JSON or does not match leaves `data` empty. Errors raised by the schema
/// itself are returned as `Err`.
async fn http_error(response: ResponseHandle, schema: Option<&dyn Schema>) -> Result<RequestError> {
    let Some(schema) = schema else {
        return Ok(RequestError::http(response, None));
    };

    let body = match response.json() {
        Ok(body) => body,
        Err(err) => {
            debug!(status = response.status(), error = %err, "Error body is not JSON");
            return Ok(RequestError::http(response, None));
        }
    };

    match validation::validate(schema, body).await {
        Ok(data) => Ok(RequestError::http(response, Some(data))),
        Err(err @ RequestError::Validation { .. }) => {
            debug!(status = response.status(), error = %err, "Error body did not match schema");
            Ok(RequestError::http(response, None))
        }
        Err(err) => Err(err),
    }
}
