//! Modular common utilities shared across Courier crates.
//!
//! Nothing in this crate knows about requests or schemas; it provides the
//! generic building blocks the request pipeline is assembled from.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: URL and query building, credential encoding
//! - `runtime`: async infrastructure (retry executor)
//! - `observability`: tracing (implied by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{api_key_header_value, basic_header_value, bearer_header_value};
#[cfg(feature = "runtime")]
pub use resilience::{
    BackoffStrategy, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
    RetryResult,
};
#[cfg(feature = "foundation")]
pub use utils::url::{append_query, is_absolute_url, join_base_url};
