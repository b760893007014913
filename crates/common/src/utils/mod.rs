//! Common utility functions
//!
//! - **[`url`]**: base-URL joining and query-string building

pub mod url;

// Re-export commonly used items for convenience
pub use self::url::{append_query, is_absolute_url, join_base_url};
