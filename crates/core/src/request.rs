//! Request resolution
//!
//! Combines a call's options with the global configuration snapshot into a
//! fully resolved [`RequestDescriptor`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use courier_common::{
    api_key_header_value, append_query, basic_header_value, bearer_header_value, join_base_url,
};
use courier_domain::constants::{AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};
use courier_domain::{
    Auth, GlobalConfig, HeaderName, HeaderValue, Headers, HttpMethod, QueryValue, RequestBody,
    RequestError, Result, RetryPolicy,
};

use crate::options::RequestOptions;
use crate::ports::{Schema, SerializedBody, TransportRequest};

/// One fully resolved exchange. Built fresh for every call.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub retry: Option<RetryPolicy>,
    pub timeout: Option<Duration>,
    pub error_schema: Option<Arc<dyn Schema>>,
}

impl RequestDescriptor {
    /// Resolve `url` and `options` against `config`.
    ///
    /// Headers are layered global, then auth, then per-call. Retry policy and
    /// timeout from the call replace the global ones entirely. A JSON `null`
    /// body resolves to no body.
    ///
    /// Fails with a validation error when a header cannot be sent.
    pub fn resolve(
        method: HttpMethod,
        url: &str,
        options: &RequestOptions,
        config: &GlobalConfig,
    ) -> Result<Self> {
        if let Some(err) = &options.header_error {
            return Err(RequestError::invalid_header(err));
        }

        let base_url = options.base_url.as_deref().or(config.base_url.as_deref());
        let url = append_query(&join_base_url(base_url, url), query_pairs(&options.query));

        let mut headers = config.headers.clone();
        if let Some(value) = authorization_header(&options.auth) {
            headers
                .try_insert_sensitive(AUTHORIZATION_HEADER, &value)
                .map_err(|err| RequestError::invalid_header(&err))?;
        }
        headers.extend_from(&options.headers);

        Ok(Self {
            method,
            url,
            headers,
            body: options.body.clone().filter(|body| !body.is_null()),
            retry: options.retry.clone().or_else(|| config.retry.clone()),
            timeout: options.timeout.or_else(|| config.timeout()),
            error_schema: options.error_schema.clone(),
        })
    }

    /// Wire form of this request. JSON bodies are stringified and get a
    /// JSON content type unless one was set explicitly.
    pub fn transport_request(&self) -> TransportRequest {
        let mut headers = self.headers.clone();
        let body = self.body.as_ref().map(|body| match body {
            RequestBody::Json(value) => {
                if !headers.contains(CONTENT_TYPE_HEADER) {
                    headers.insert(
                        HeaderName::from_static(CONTENT_TYPE_HEADER),
                        HeaderValue::from_static(JSON_CONTENT_TYPE),
                    );
                }
                SerializedBody::Text(value.to_string())
            }
            RequestBody::Text(text) => SerializedBody::Text(text.clone()),
            RequestBody::Bytes(bytes) => SerializedBody::Bytes(bytes.clone()),
            RequestBody::Form(fields) => SerializedBody::Form(fields.clone()),
        });

        TransportRequest {
            method: self.method,
            url: self.url.clone(),
            headers,
            body,
            timeout: self.timeout,
        }
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("error_schema", &self.error_schema.is_some())
            .finish()
    }
}

/// `Authorization` value for the highest-precedence credential:
/// bearer, then API key, then basic.
pub fn authorization_header(auth: &Auth) -> Option<String> {
    if let Some(token) = &auth.bearer {
        return Some(bearer_header_value(token));
    }
    if let Some(key) = &auth.api_key {
        return Some(api_key_header_value(key));
    }
    auth.basic.as_ref().map(|basic| basic_header_value(&basic.username, &basic.password))
}

fn query_pairs(query: &[(String, QueryValue)]) -> Vec<(&str, String)> {
    query
        .iter()
        .filter_map(|(key, value)| value.to_query_string().map(|value| (key.as_str(), value)))
        .collect()
}
