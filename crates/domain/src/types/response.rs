//! Buffered HTTP response

use bytes::Bytes;
use serde_json::{json, Value};

use super::Headers;

/// A completed HTTP exchange with its body fully read.
///
/// The body is buffered once so it can be parsed by the pipeline and still
/// handed to error callbacks afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHandle {
    status: u16,
    status_text: String,
    url: String,
    headers: Headers,
    body: Bytes,
}

impl ResponseHandle {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
        headers: Headers,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            url: url.into(),
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body)
    }
}

/// What the `on_http_error` slot receives.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpErrorBody {
    /// Error body that passed the error schema.
    Validated(Value),
    /// No error schema, or the body did not match it.
    Raw(ResponseHandle),
}

impl HttpErrorBody {
    pub fn into_value(self) -> Value {
        match self {
            Self::Validated(value) => value,
            Self::Raw(response) => json!({
                "status": response.status(),
                "status_text": response.status_text(),
                "url": response.url(),
                "body": response.text(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(status: u16, body: &'static str) -> ResponseHandle {
        ResponseHandle::new(status, "", "http://localhost/", Headers::new(), body)
    }

    #[test]
    fn empty_body_parses_as_null() {
        assert_eq!(handle(204, "").json().unwrap(), Value::Null);
        assert_eq!(handle(200, "  \n").json().unwrap(), Value::Null);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(handle(200, "<html>").json().is_err());
        assert_eq!(handle(200, "<html>").text(), "<html>");
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(handle(200, "").is_success());
        assert!(handle(299, "").is_success());
        assert!(!handle(304, "").is_success());
        assert!(!handle(404, "").is_success());
    }

    #[test]
    fn raw_error_body_summarizes_response() {
        let value = HttpErrorBody::Raw(handle(502, "upstream down")).into_value();
        assert_eq!(value["status"], 502);
        assert_eq!(value["body"], "upstream down");
    }
}
