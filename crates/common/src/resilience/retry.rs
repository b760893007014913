//! Generic retry executor with deterministic backoff
//!
//! The executor is generic over the operation's error type. Callers decide
//! which errors are worth another attempt by implementing [`RetryPolicy`];
//! the executor owns attempt counting, delay calculation and sleeping.
//!
//! Delays carry no jitter so that a given configuration always produces the
//! same schedule.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The final allowed attempt failed. `source` is that attempt's error.
    #[error("Operation failed on final attempt {attempts}: {source}")]
    LastAttemptFailed { attempts: u32, source: E },

    /// The policy declined to retry the error.
    #[error("Operation failed with non-retryable error: {source}")]
    NonRetryable { attempts: u32, source: E },

    /// The loop ended without running a failing attempt (`max_attempts == 0`).
    #[error("All retry attempts exhausted after {attempts} tries")]
    AttemptsExhausted { attempts: u32 },
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Decide what to do after `attempt` (1-based) failed with `error`.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;

    /// Called once a retry has been decided, before the backoff sleep.
    fn on_retry(&self, _attempt: u32, _error: &E) {}
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation after the backoff delay
    Retry,
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// `initial_delay * attempt`, capped at `max_delay`
    Linear { initial_delay: Duration, max_delay: Duration },
    /// `initial_delay * 2^(attempt - 1)`, capped at `max_delay`
    Exponential { initial_delay: Duration, max_delay: Duration },
}

impl BackoffStrategy {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Linear { initial_delay, max_delay } => {
                initial_delay.saturating_mul(attempt).min(*max_delay)
            }
            Self::Exponential { initial_delay, max_delay } => {
                let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                initial_delay.saturating_mul(factor).min(*max_delay)
            }
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self { max_attempts, backoff }
    }
}

/// The main retry executor
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Execute an operation with retry logic.
    ///
    /// The configuration is not validated here: a `max_attempts` of zero runs
    /// no attempt and yields [`RetryError::AttemptsExhausted`].
    #[instrument(skip(self, operation), fields(max_attempts = self.config.max_attempts))]
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts;
        let mut attempt = 1;

        while attempt <= max_attempts {
            debug!(attempt, max_attempts, "Executing operation");

            let error = match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts {
                warn!(attempts = attempt, error = ?error, "All retry attempts exhausted");
                return Err(RetryError::LastAttemptFailed { attempts: attempt, source: error });
            }

            if self.policy.should_retry(&error, attempt) == RetryDecision::Stop {
                debug!(attempt, error = ?error, "Retry policy determined not to retry");
                return Err(RetryError::NonRetryable { attempts: attempt, source: error });
            }

            let delay = self.config.backoff.calculate_delay(attempt);
            self.policy.on_retry(attempt, &error);
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            warn!(attempt, delay_ms, "Operation failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }

        Err(RetryError::AttemptsExhausted { attempts: max_attempts })
    }
}
