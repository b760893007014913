//! Resilience patterns for transient failures
//!
//! This module provides a **generic, reusable** retry executor. It is
//! generic over the operation's error type; request-specific retry
//! eligibility lives with the caller as a [`RetryPolicy`] implementation.

pub mod retry;

// Re-export retry types
pub use retry::{
    BackoffStrategy, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
    RetryResult,
};
