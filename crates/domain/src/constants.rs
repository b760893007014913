//! Domain constants
//!
//! Centralized defaults and message prefixes shared by every Courier crate.

// Validation message prefixes
pub const INPUT_VALIDATION_PREFIX: &str = "Input validation failed";
pub const RESPONSE_VALIDATION_PREFIX: &str = "Response validation failed";
pub const CALLBACK_VALIDATION_PREFIX: &str = "Callback result validation failed";
pub const GENERIC_VALIDATION_PREFIX: &str = "Validation failed";
pub const UNKNOWN_VALIDATION_ERROR: &str = "Unknown validation error";
pub const RESPONSE_PARSING_ERROR: &str = "Response parsing failed";
pub const HEADER_VALIDATION_PREFIX: &str = "Request header validation failed";

// Retry defaults
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

// Header names
pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
