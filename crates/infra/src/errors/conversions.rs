//! Conversions from external infrastructure errors into transport errors.

use courier_core::TransportError;
use reqwest::Error as HttpError;

/// Extension trait to make the conversion logic explicit at call sites.
///
/// Both types are foreign to this crate, so a `From` impl is not possible.
pub trait IntoTransportError {
    fn into_transport_error(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport_error(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::Timeout;
        }

        let message = if self.is_connect() {
            "HTTP connection failure".to_string()
        } else if self.is_builder() {
            format!("Invalid HTTP request: {self}")
        } else if self.is_body() || self.is_decode() {
            format!("Failed to read HTTP response body: {self}")
        } else {
            format!("HTTP request failed: {self}")
        };

        TransportError::failure(message, self)
    }
}
