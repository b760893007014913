//! Authorization header encoding
//!
//! Formats credentials into `Authorization` header values. Choosing which
//! credential applies is the caller's concern.

pub mod header;

pub use header::{api_key_header_value, basic_header_value, bearer_header_value};
