//! # Courier Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpTransport`]
//! - Loading [`GlobalConfig`](courier_domain::GlobalConfig) from the
//!   environment or from JSON/TOML files
//!
//! ## Architecture
//! - Implements traits defined in `courier-core`
//! - Contains all "impure" code (network and file I/O)

pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use config::{load, load_from_env, load_from_file, probe_config_paths};
pub use http::{HttpTransport, HttpTransportBuilder};
