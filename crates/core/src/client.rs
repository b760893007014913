//! Request orchestrator
//!
//! [`Client`] drives a request through resolution, input validation,
//! execution, success-body parsing and outcome routing, and returns either a
//! value or exactly one [`RequestError`].

use std::sync::Arc;

use courier_domain::constants::{
    INPUT_VALIDATION_PREFIX, RESPONSE_PARSING_ERROR, RESPONSE_VALIDATION_PREFIX,
};
use courier_domain::{ErrorKind, HttpMethod, Issue, RequestBody, RequestError, ResponseHandle, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::callbacks::{self, Callbacks};
use crate::config::ConfigStore;
use crate::executor::RequestExecutor;
use crate::options::RequestOptions;
use crate::ports::{Schema, Transport};
use crate::request::RequestDescriptor;
use crate::validation;

/// Entry point for issuing requests.
///
/// Cheap to clone; clones share the transport and configuration store.
#[derive(Clone)]
pub struct Client {
    executor: RequestExecutor,
    config: Arc<ConfigStore>,
}

impl Client {
    /// Client bound to the process-wide configuration store.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ConfigStore::global())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: Arc<ConfigStore>) -> Self {
        Self { executor: RequestExecutor::new(transport), config }
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Get, url, options).await
    }

    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Post, url, options).await
    }

    pub async fn put(&self, url: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Put, url, options).await
    }

    pub async fn patch(&self, url: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Patch, url, options).await
    }

    pub async fn delete(&self, url: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Delete, url, options).await
    }

    /// Like [`Client::request`], deserializing the outcome into `T`.
    pub async fn send_as<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.request(method, url, options).await?;
        serde_json::from_value(value)
            .map_err(|err| RequestError::validation_failed(vec![Issue::new(err.to_string())]))
    }

    /// Run one request through the full pipeline.
    #[instrument(skip(self, options), fields(method = %method, url = %url))]
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let config = self.config.snapshot();
        // Unsendable headers and input validation failures are raised before
        // anything is sent and are never routed to callbacks.
        let mut descriptor = RequestDescriptor::resolve(method, url, &options, &config)?;

        if let Some(schema) = &options.input_schema {
            if let Some(body) = descriptor.body.take() {
                descriptor.body = Some(validate_input(schema.as_ref(), body).await?);
            }
        }

        match self.dispatch(&descriptor, &options).await {
            Ok(value) => Ok(value),
            Err(error) => route_error(&options.callbacks, error).await,
        }
    }

    async fn dispatch(&self, descriptor: &RequestDescriptor, options: &RequestOptions) -> Result<Value> {
        let response = self.executor.execute(descriptor).await?;

        let parsed = match parse_success(&response, options.success_schema.as_deref()).await {
            Ok(parsed) => parsed,
            Err(error) if error.kind() == ErrorKind::Validation => {
                let Some(callback) = options.callbacks.on_validation_error.as_ref() else {
                    return Err(error);
                };
                debug!(error = %error, "Routing response validation error");
                return callbacks::dispatch(Some(callback), error).await;
            }
            Err(error) => return Err(error),
        };

        info!(status = response.status(), "Request completed");
        callbacks::dispatch(options.callbacks.on_success.as_ref(), parsed).await
    }
}

async fn validate_input(schema: &dyn Schema, body: RequestBody) -> Result<RequestBody> {
    let Some(value) = body.as_value() else {
        return Ok(body);
    };
    let validated = validation::validate(schema, value)
        .await
        .map_err(|err| err.prefixed(INPUT_VALIDATION_PREFIX))?;
    Ok(body.with_validated(validated))
}

async fn parse_success(response: &ResponseHandle, schema: Option<&dyn Schema>) -> Result<Value> {
    let body = response.json().map_err(|err| {
        RequestError::validation(
            format!("{RESPONSE_PARSING_ERROR}: {err}"),
            vec![Issue::new(err.to_string())],
        )
    })?;

    match schema {
        Some(schema) => validation::validate(schema, body)
            .await
            .map_err(|err| err.prefixed(RESPONSE_VALIDATION_PREFIX)),
        None => Ok(body),
    }
}

/// Hand an error to the most specific callback that accepts it.
///
/// Callback-result validation errors always escape. HTTP errors only reach
/// `on_http_error`; network and timeout errors fall back to `on_error`.
async fn route_error(callbacks: &Callbacks, error: RequestError) -> Result<Value> {
    if error.is_callback_result_validation() {
        return Err(error);
    }

    let kind = error.kind();
    debug!(%kind, error = %error, "Routing request error");

    match kind {
        ErrorKind::Http => {
            return match (callbacks.on_http_error.as_ref(), error.http_body()) {
                (Some(callback), Some(body)) => callbacks::dispatch(Some(callback), body).await,
                _ => Err(error),
            };
        }
        ErrorKind::Network => {
            if let Some(callback) = callbacks.on_network_error.as_ref() {
                return callbacks::dispatch(Some(callback), error).await;
            }
        }
        ErrorKind::Timeout => {
            if let Some(callback) = callbacks.on_timeout.as_ref() {
                return callbacks::dispatch(Some(callback), error).await;
            }
        }
        ErrorKind::Validation | ErrorKind::RetryExhausted => {}
    }

    match callbacks.on_error.as_ref() {
        Some(callback) => callbacks::dispatch(Some(callback), error).await,
        None => Err(error),
    }
}
