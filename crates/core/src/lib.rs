//! # Courier Core
//!
//! Request pipeline - no HTTP stack dependencies.
//!
//! This crate contains:
//! - Ports for the transport and for schemas (traits)
//! - Request resolution, execution and retry
//! - Outcome callbacks and error routing
//! - The process-wide configuration store
//!
//! ## Architecture Principles
//! - Only depends on `courier-common` and `courier-domain`
//! - The wire is reached through [`Transport`]; adapters live in
//!   `courier-infra`
//! - Every request produces exactly one value or one [`RequestError`]
//!
//! [`RequestError`]: courier_domain::RequestError

pub mod callbacks;
pub mod client;
pub mod config;
pub mod executor;
pub mod options;
pub mod ports;
pub mod request;
pub mod retry;
pub mod validation;

pub use callbacks::{Callback, CallbackInput, Callbacks};
pub use client::Client;
pub use config::ConfigStore;
pub use executor::RequestExecutor;
pub use options::RequestOptions;
pub use ports::{Schema, SerializedBody, Transport, TransportError, TransportRequest};
pub use request::RequestDescriptor;
pub use validation::{FnSchema, StandardSchema, TypedSchema};
