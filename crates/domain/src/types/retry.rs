//! Retry policy configuration

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_DELAY_MS, DEFAULT_RETRYABLE_STATUSES,
    DEFAULT_RETRY_ATTEMPTS,
};
use crate::errors::{ConfigError, RequestError};

/// Observer invoked before each retry with the upcoming attempt number
/// (starting at 1) and the error that triggered it.
pub type RetryObserver = Arc<dyn Fn(u32, &RequestError) + Send + Sync>;

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// `initial_delay * attempt`
    Linear,
    /// `initial_delay * 2^(attempt - 1)`
    #[default]
    Exponential,
}

impl FromStr for BackoffKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "exponential" => Ok(Self::Exponential),
            other => Err(ConfigError::Invalid(format!("unknown backoff strategy '{other}'"))),
        }
    }
}

/// Retry behaviour for a request.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub attempts: u32,
    pub backoff: BackoffKind,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// HTTP statuses that trigger a retry. Network errors always do.
    pub retry_on: BTreeSet<u16>,
    #[serde(skip)]
    pub on_retry: Option<RetryObserver>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff: BackoffKind::default(),
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            retry_on: DEFAULT_RETRYABLE_STATUSES.iter().copied().collect(),
            on_retry: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("attempts", &self.attempts)
            .field("backoff", &self.backoff)
            .field("initial_delay_ms", &self.initial_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .field("retry_on", &self.retry_on)
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

impl RetryPolicy {
    /// Default policy with `attempts` total attempts (at least one).
    pub fn new(attempts: u32) -> Self {
        Self { attempts: attempts.max(1), ..Self::default() }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffKind) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay_ms = duration_millis(delay);
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = duration_millis(delay);
        self
    }

    #[must_use]
    pub fn with_retry_on(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_on = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn on_retry<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32, &RequestError) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_on.contains(&status)
    }

    /// Reject configurations that can never behave sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 {
            return Err(ConfigError::Invalid("retry attempts must be at least 1".to_string()));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "retry max_delay_ms ({}) is smaller than initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            )));
        }
        if let Some(status) = self.retry_on.iter().find(|status| !(100..=599).contains(*status)) {
            return Err(ConfigError::Invalid(format!("retry status {status} is not an HTTP status")));
        }
        Ok(())
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
