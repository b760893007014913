//! Case-insensitive header map

use std::collections::BTreeMap;

pub use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::HeaderError;

/// Header collection keyed by validated, case-insensitive names.
///
/// Names and values are checked when they enter the map, so anything stored
/// here can be put on the wire as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HeaderMap,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and insert a header, replacing every existing value for the
    /// name. Returns the first replaced value.
    pub fn try_insert(&mut self, name: &str, value: &str) -> Result<Option<String>, HeaderError> {
        let (name, value) = parse(name, value)?;
        Ok(self.insert(name, value).map(|previous| lossy(&previous)))
    }

    /// Like [`Headers::try_insert`], marking the value as sensitive so it is
    /// never printed by `Debug`.
    pub fn try_insert_sensitive(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let (name, mut value) = parse(name, value)?;
        value.set_sensitive(true);
        self.insert(name, value);
        Ok(())
    }

    /// Builder-style [`Headers::try_insert`].
    pub fn try_with(mut self, name: &str, value: &str) -> Result<Self, HeaderError> {
        self.try_insert(name, value)?;
        Ok(self)
    }

    pub fn insert(&mut self, name: HeaderName, value: HeaderValue) -> Option<HeaderValue> {
        self.map.insert(name, value)
    }

    /// First value for `name`, if it is visible ASCII.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.remove(name).map(|value| lossy(&value))
    }

    /// Copy every header from `other`, replacing all values of matching names.
    pub fn extend_from(&mut self, other: &Self) {
        self.map.extend(other.map.clone());
    }

    /// New map with `other` layered on top of `self`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.map.iter()
    }

    /// Number of values, counting repeated names once per value.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_header_map(&self) -> &HeaderMap {
        &self.map
    }

    pub fn into_header_map(self) -> HeaderMap {
        self.map
    }
}

impl From<HeaderMap> for Headers {
    fn from(map: HeaderMap) -> Self {
        Self { map }
    }
}

fn parse(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), HeaderError> {
    let parsed_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| HeaderError::InvalidName { name: name.to_string() })?;
    let parsed_value = HeaderValue::from_str(value)
        .map_err(|_| HeaderError::InvalidValue { name: parsed_name.as_str().to_string() })?;
    Ok((parsed_name, parsed_value))
}

fn lossy(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

impl Serialize for Headers {
    /// Repeated names are joined with `", "`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.map.keys().map(|name| {
            let joined =
                self.map.get_all(name).iter().map(lossy).collect::<Vec<_>>().join(", ");
            (name.as_str(), joined)
        }))
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut headers = Self::new();
        for (name, value) in &raw {
            headers.try_insert(name, value).map_err(de::Error::custom)?;
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut headers = Headers::new().try_with("Content-Type", "text/plain").unwrap();
        let previous = headers.try_insert("content-type", "application/json").unwrap();

        assert_eq!(previous.as_deref(), Some("text/plain"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn merged_prefers_right_hand_side() {
        let base = Headers::new()
            .try_with("X-Trace", "base")
            .and_then(|headers| headers.try_with("Accept", "*/*"))
            .unwrap();
        let overlay = Headers::new().try_with("x-trace", "call").unwrap();

        let merged = base.merged(&overlay);
        assert_eq!(merged.get("X-Trace"), Some("call"));
        assert_eq!(merged.get("accept"), Some("*/*"));
        assert_eq!(base.get("X-Trace"), Some("base"));
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut headers = Headers::new().try_with("Authorization", "Bearer t").unwrap();
        assert_eq!(headers.remove("authorization").as_deref(), Some("Bearer t"));
        assert!(headers.is_empty());
    }

    #[test]
    fn rejects_invalid_names_and_values() {
        let mut headers = Headers::new();

        assert_eq!(
            headers.try_insert("bad header", "x"),
            Err(HeaderError::InvalidName { name: "bad header".into() })
        );
        assert_eq!(
            headers.try_insert("X-Token", "tok\nen"),
            Err(HeaderError::InvalidValue { name: "x-token".into() })
        );
        assert!(headers.is_empty());
    }

    #[test]
    fn sensitive_values_are_hidden_from_debug() {
        let mut headers = Headers::new();
        headers.try_insert_sensitive("Authorization", "Bearer secret").unwrap();

        assert_eq!(headers.get("authorization"), Some("Bearer secret"));
        assert!(!format!("{headers:?}").contains("secret"));
    }

    #[test]
    fn deserializes_from_map() {
        let headers: Headers =
            serde_json::from_str(r#"{"X-Client": "courier", "Accept": "application/json"}"#)
                .unwrap();
        assert_eq!(headers.get("x-client"), Some("courier"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn deserialize_rejects_invalid_header() {
        let result = serde_json::from_str::<Headers>(r#"{"X Client": "courier"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_repeated_values_joined() {
        let mut map = HeaderMap::new();
        map.append("vary", HeaderValue::from_static("accept"));
        map.append("vary", HeaderValue::from_static("origin"));

        let value = serde_json::to_value(Headers::from(map)).unwrap();
        assert_eq!(value, serde_json::json!({"vary": "accept, origin"}));
    }
}
