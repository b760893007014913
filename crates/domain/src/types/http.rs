//! HTTP request data: methods, bodies, query values and credentials

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured data, sent as JSON.
    Json(Value),
    /// Sent verbatim.
    Text(String),
    /// Sent verbatim. Never validated.
    Bytes(Bytes),
    /// URL-encoded form fields.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// A JSON `null` body, which is sent as no body at all.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// The body as a value a schema can check, or `None` for raw bytes.
    ///
    /// Form fields become a JSON object, so repeated names collapse to the
    /// last value and field order is not kept.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value.clone()),
            Self::Text(text) => Some(Value::String(text.clone())),
            Self::Form(fields) => Some(Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect::<Map<_, _>>(),
            )),
            Self::Bytes(_) => None,
        }
    }

    /// Replace the body with the schema's (possibly transformed) output,
    /// keeping the original encoding where the output still fits it.
    ///
    /// An output equal to [`RequestBody::as_value`] leaves the body untouched,
    /// so repeated form fields and their order survive validation.
    #[must_use]
    pub fn with_validated(self, value: Value) -> Self {
        if self.as_value().as_ref() == Some(&value) {
            return self;
        }
        match (self, value) {
            (Self::Text(_), Value::String(text)) => Self::Text(text),
            (Self::Form(_), Value::Object(map))
                if map.values().all(Value::is_string) =>
            {
                Self::Form(
                    map.into_iter()
                        .map(|(name, value)| match value {
                            Value::String(text) => (name, text),
                            other => (name, other.to_string()),
                        })
                        .collect(),
                )
            }
            (Self::Bytes(bytes), _) => Self::Bytes(bytes),
            (_, value) => Self::Json(value),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

/// A query-string parameter value. `Null` parameters are omitted.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// String form used in the URL, `None` for `Null`.
    pub fn to_query_string(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Null => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// HTTP basic credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Credentials for a single request.
///
/// When more than one field is set only the first of `bearer`, `api_key`,
/// `basic` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub bearer: Option<String>,
    pub api_key: Option<String>,
    pub basic: Option<BasicAuth>,
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { bearer: Some(token.into()), ..Self::default() }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self { api_key: Some(key.into()), ..Self::default() }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            basic: Some(BasicAuth { username: username.into(), password: password.into() }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bearer.is_none() && self.api_key.is_none() && self.basic.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_body_validates_as_string_object() {
        let body = RequestBody::Form(vec![("name".into(), "ada".into())]);
        assert_eq!(body.as_value(), Some(json!({"name": "ada"})));
    }

    #[test]
    fn bytes_body_has_no_value() {
        assert_eq!(RequestBody::from(vec![1u8, 2, 3]).as_value(), None);
    }

    #[test]
    fn with_validated_keeps_encoding_when_possible() {
        let text = RequestBody::from("raw").with_validated(json!("trimmed"));
        assert_eq!(text, RequestBody::Text("trimmed".into()));

        let form = RequestBody::Form(vec![("a".into(), "1".into())])
            .with_validated(json!({"a": "2"}));
        assert_eq!(form, RequestBody::Form(vec![("a".into(), "2".into())]));

        let coerced = RequestBody::from("42").with_validated(json!(42));
        assert_eq!(coerced, RequestBody::Json(json!(42)));
    }

    #[test]
    fn unchanged_form_keeps_repeated_fields_and_order() {
        let fields: Vec<(String, String)> = [("tag", "a"), ("tag", "b"), ("b", "1"), ("a", "2")]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let body = RequestBody::Form(fields.clone());
        let value = body.as_value().unwrap();

        assert_eq!(value, json!({"tag": "b", "b": "1", "a": "2"}));
        assert_eq!(body.with_validated(value), RequestBody::Form(fields));
    }

    #[test]
    fn null_json_is_null() {
        assert!(RequestBody::Json(Value::Null).is_null());
        assert!(RequestBody::json(&None::<u8>).unwrap().is_null());
        assert!(!RequestBody::from("null").is_null());
    }

    #[test]
    fn query_values_stringify() {
        assert_eq!(QueryValue::from(3).to_query_string().as_deref(), Some("3"));
        assert_eq!(QueryValue::from(true).to_query_string().as_deref(), Some("true"));
        assert_eq!(QueryValue::from(1.5).to_query_string().as_deref(), Some("1.5"));
        assert_eq!(QueryValue::from(None::<&str>).to_query_string(), None);
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(HttpMethod::Patch).unwrap(), json!("PATCH"));
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
