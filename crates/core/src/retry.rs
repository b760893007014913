//! Retry controller for request exchanges
//!
//! Maps a [`RetryPolicy`] onto the generic executor in
//! `courier_common::resilience` and decides which request errors are worth
//! another attempt.

use std::future::Future;

use courier_common::resilience::{
    self, BackoffStrategy, RetryConfig, RetryDecision, RetryError, RetryExecutor,
};
use courier_domain::{BackoffKind, RequestError, Result, RetryPolicy};
use tracing::warn;

/// Retry rule derived from a request's [`RetryPolicy`].
struct StatusRetryRule<'a> {
    policy: &'a RetryPolicy,
}

impl resilience::RetryPolicy<RequestError> for StatusRetryRule<'_> {
    fn should_retry(&self, error: &RequestError, _attempt: u32) -> RetryDecision {
        if error.is_retryable_by(self.policy) {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }

    fn on_retry(&self, attempt: u32, error: &RequestError) {
        if let Some(observer) = &self.policy.on_retry {
            observer(attempt, error);
        }
    }
}

/// Backoff schedule for `policy`.
pub fn backoff_strategy(policy: &RetryPolicy) -> BackoffStrategy {
    let initial_delay = policy.initial_delay();
    let max_delay = policy.max_delay();
    match policy.backoff {
        BackoffKind::Linear => BackoffStrategy::Linear { initial_delay, max_delay },
        BackoffKind::Exponential => BackoffStrategy::Exponential { initial_delay, max_delay },
    }
}

/// Run `operation` under `policy`.
///
/// `operation` receives the 1-based attempt number. The error of the last
/// attempt is returned unchanged; [`RequestError::RetryExhausted`] only
/// appears when the policy allows no attempts at all.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let config = RetryConfig::new(policy.attempts, backoff_strategy(policy));
    let executor = RetryExecutor::new(config, StatusRetryRule { policy });

    executor.execute(operation).await.map_err(|err| match err {
        RetryError::LastAttemptFailed { source, .. } | RetryError::NonRetryable { source, .. } => {
            source
        }
        RetryError::AttemptsExhausted { attempts } => {
            warn!(attempts, "Retry loop ended without a result");
            RequestError::retry_exhausted(attempts, None)
        }
    })
}
