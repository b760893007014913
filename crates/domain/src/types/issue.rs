//! Validation issues and validator outcomes

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step in the path to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single validation problem reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), path: None }
    }

    /// Issue located at `path`. Mixed key/index paths are built from
    /// [`PathSegment`] values directly.
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self { message: message.into(), path: Some(path.into_iter().map(Into::into).collect()) }
    }

    /// Dotted path, or `None` when the issue applies to the root value.
    pub fn path_string(&self) -> Option<String> {
        self.path.as_ref().filter(|path| !path.is_empty()).map(|path| {
            path.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
        })
    }

    /// Join issues into `path: message; path: message`.
    pub fn summarize(issues: &[Self]) -> String {
        issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path_string() {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of running a value through a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The value passed and may have been transformed.
    Success { value: Value },
    /// The value was rejected.
    Failure { issues: Vec<Issue> },
}

impl ValidationOutcome {
    pub fn success(value: Value) -> Self {
        Self::Success { value }
    }

    pub fn failure(issues: Vec<Issue>) -> Self {
        Self::Failure { issues }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Interpret a raw `{ "value": ... }` / `{ "issues": [...] }` result.
    ///
    /// Returns `None` when the shape is neither, or the issues cannot be read.
    pub fn from_standard(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        match (object.get("value"), object.get("issues")) {
            (_, Some(issues)) if !issues.is_null() => {
                serde_json::from_value::<Vec<Issue>>(issues.clone()).ok().map(Self::failure)
            }
            (Some(value), _) => Some(Self::success(value.clone())),
            _ => None,
        }
    }
}
