//! # Courier Domain
//!
//! Request/response data model for Courier.
//!
//! This crate contains:
//! - The outcome error taxonomy (`RequestError`) and `Result` alias
//! - Validation issues and tagged validation outcomes
//! - HTTP data types (methods, headers, bodies, query values, auth)
//! - The buffered `ResponseHandle`
//! - Retry policy and global configuration structures
//!
//! ## Architecture
//! - No dependencies on other Courier crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
