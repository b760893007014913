//! Process-wide request defaults

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Headers, RetryPolicy};
use crate::errors::ConfigError;

/// Defaults applied to every request unless the call overrides them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Prefixed to every URL that is not absolute.
    pub base_url: Option<String>,
    /// Lowest-precedence headers.
    pub headers: Headers,
    pub retry: Option<RetryPolicy>,
    pub timeout_ms: Option<u64>,
}

impl GlobalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header. Fails if the name or value cannot be sent.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        self.headers.try_insert(name, value)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            if base_url.trim().is_empty() {
                return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
            }
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("timeout_ms must be greater than zero".to_string()));
        }
        if let Some(retry) = &self.retry {
            retry.validate()?;
        }
        Ok(())
    }
}
