//! Request/response data types

pub mod config;
pub mod headers;
pub mod http;
pub mod issue;
pub mod response;
pub mod retry;

pub use config::GlobalConfig;
pub use headers::{HeaderMap, HeaderName, HeaderValue, Headers};
pub use http::{Auth, BasicAuth, HttpMethod, QueryValue, RequestBody};
pub use issue::{Issue, PathSegment, ValidationOutcome};
pub use response::{HttpErrorBody, ResponseHandle};
pub use retry::{BackoffKind, RetryObserver, RetryPolicy};
