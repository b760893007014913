//! Per-request options

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use courier_domain::{
    Auth, BasicAuth, HeaderError, Headers, HttpErrorBody, QueryValue, RequestBody, RequestError,
    RetryPolicy,
};
use serde_json::Value;

use crate::callbacks::{Callback, Callbacks};
use crate::ports::Schema;

/// Everything a caller can set for one request. Unset fields fall back to
/// the global configuration where one exists.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub(crate) base_url: Option<String>,
    pub(crate) query: Vec<(String, QueryValue)>,
    pub(crate) auth: Auth,
    pub(crate) headers: Headers,
    /// First header rejected by [`RequestOptions::header`], raised when the
    /// request is resolved.
    pub(crate) header_error: Option<HeaderError>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) input_schema: Option<Arc<dyn Schema>>,
    pub(crate) success_schema: Option<Arc<dyn Schema>>,
    pub(crate) error_schema: Option<Arc<dyn Schema>>,
    pub(crate) retry: Option<RetryPolicy>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) callbacks: Callbacks,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the global base URL for this request.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Append a query parameter. `Null` values are dropped when the URL is
    /// built.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.auth.bearer = Some(token.into());
        self
    }

    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.auth.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth.basic = Some(BasicAuth { username: username.into(), password: password.into() });
        self
    }

    /// Set a per-call header. An invalid name or value makes the request
    /// fail with a validation error before anything is sent.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Err(err) = self.headers.try_insert(name, value) {
            self.header_error.get_or_insert(err);
        }
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: &Headers) -> Self {
        self.headers.extend_from(headers);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn json(self, value: Value) -> Self {
        self.body(RequestBody::Json(value))
    }

    #[must_use]
    pub fn form<K, V>(self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        self.body(RequestBody::Form(fields))
    }

    /// Schema the request body must satisfy before anything is sent.
    #[must_use]
    pub fn input_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.input_schema = Some(Arc::new(schema));
        self
    }

    /// Schema for 2xx response bodies.
    #[must_use]
    pub fn success_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.success_schema = Some(Arc::new(schema));
        self
    }

    /// Schema for non-2xx response bodies.
    #[must_use]
    pub fn error_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.error_schema = Some(Arc::new(schema));
        self
    }

    /// Replaces the global retry policy for this request.
    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Replaces the global timeout for this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn on_success(mut self, callback: Callback<Value>) -> Self {
        self.callbacks.on_success = Some(callback);
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: Callback<RequestError>) -> Self {
        self.callbacks.on_error = Some(callback);
        self
    }

    #[must_use]
    pub fn on_network_error(mut self, callback: Callback<RequestError>) -> Self {
        self.callbacks.on_network_error = Some(callback);
        self
    }

    #[must_use]
    pub fn on_validation_error(mut self, callback: Callback<RequestError>) -> Self {
        self.callbacks.on_validation_error = Some(callback);
        self
    }

    #[must_use]
    pub fn on_http_error(mut self, callback: Callback<HttpErrorBody>) -> Self {
        self.callbacks.on_http_error = Some(callback);
        self
    }

    #[must_use]
    pub fn on_timeout(mut self, callback: Callback<RequestError>) -> Self {
        self.callbacks.on_timeout = Some(callback);
        self
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .field("has_auth", &!self.auth.is_empty())
            .field("headers", &self.headers)
            .field("header_error", &self.header_error)
            .field("body", &self.body)
            .field("input_schema", &self.input_schema.is_some())
            .field("success_schema", &self.success_schema.is_some())
            .field("error_schema", &self.error_schema.is_some())
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_accumulates_fields() {
        let options = RequestOptions::new()
            .query("page", 1)
            .query("filter", None::<&str>)
            .header("X-Trace", "abc")
            .bearer("t")
            .json(json!({"a": 1}))
            .timeout_ms(250);

        assert_eq!(options.query.len(), 2);
        assert_eq!(options.headers.get("x-trace"), Some("abc"));
        assert_eq!(options.auth.bearer.as_deref(), Some("t"));
        assert_eq!(options.body, Some(RequestBody::Json(json!({"a": 1}))));
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn invalid_header_is_kept_for_resolution() {
        let options = RequestOptions::new()
            .header("X-Bad", "a\r\nb")
            .header("bad name", "x")
            .header("X-Good", "ok");

        assert_eq!(options.header_error, Some(HeaderError::InvalidValue { name: "x-bad".into() }));
        assert_eq!(options.headers.get("x-good"), Some("ok"));
        assert!(!options.headers.contains("x-bad"));
    }

    #[test]
    fn form_builder_keeps_order() {
        let options = RequestOptions::new().form([("b", "2"), ("a", "1")]);
        assert_eq!(
            options.body,
            Some(RequestBody::Form(vec![("b".into(), "2".into()), ("a".into(), "1".into())]))
        );
    }

    #[test]
    fn debug_does_not_leak_credentials() {
        let options = RequestOptions::new().basic_auth("user", "secret");
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("has_auth: true"));
    }
}
