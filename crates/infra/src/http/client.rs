use std::time::Duration;

use async_trait::async_trait;
use courier_core::{SerializedBody, Transport, TransportError, TransportRequest};
use courier_domain::{HeaderError, Headers, HttpMethod, ResponseHandle};
use reqwest::{Client as ReqwestClient, Method, Response};
use tracing::debug;

use crate::errors::IntoTransportError;

/// [`Transport`] that performs exchanges with reqwest.
///
/// Retries and validation are handled by the pipeline; this type only sends
/// one request and buffers the response body.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<ResponseHandle, TransportError> {
        let TransportRequest { method, url, headers, body, timeout } = request;

        let mut builder =
            self.client.request(reqwest_method(method), &url).headers(headers.into_header_map());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = match body {
            Some(SerializedBody::Text(text)) => builder.body(text),
            Some(SerializedBody::Bytes(bytes)) => builder.body(bytes),
            Some(SerializedBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        debug!(%method, %url, "sending HTTP request");
        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            err.into_transport_error()
        })?;

        let handle = buffer_response(response).await?;
        debug!(%method, %url, status = handle.status(), "received HTTP response");
        Ok(handle)
    }
}

async fn buffer_response(response: Response) -> Result<ResponseHandle, TransportError> {
    let status = response.status();
    let url = response.url().to_string();
    let headers = Headers::from(response.headers().clone());

    let body = response.bytes().await.map_err(IntoTransportError::into_transport_error)?;

    Ok(ResponseHandle::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        url,
        headers,
        body,
    ))
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: Headers,
    header_error: Option<HeaderError>,
    accept_invalid_certs: bool,
}

impl HttpTransportBuilder {
    /// Client-wide cap on every exchange, applied in addition to any
    /// per-request deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request unless the request sets them itself.
    /// An invalid header is reported by [`HttpTransportBuilder::build`].
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        if let Err(err) = self.default_headers.try_insert(name, value) {
            self.header_error.get_or_insert(err);
        }
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(err) = self.header_error {
            return Err(TransportError::failure("Invalid default header", err));
        }
        if !self.default_headers.is_empty() {
            builder = builder.default_headers(self.default_headers.into_header_map());
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(IntoTransportError::into_transport_error)?;
        Ok(HttpTransport { client })
    }
}
