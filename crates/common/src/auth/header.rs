//! `Authorization` header value builders

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// `Bearer <token>`
pub fn bearer_header_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// `ApiKey <key>`
pub fn api_key_header_value(key: &str) -> String {
    format!("ApiKey {key}")
}

/// `Basic base64(username:password)` using the standard padded alphabet.
pub fn basic_header_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_credentials_are_base64_encoded() {
        assert_eq!(basic_header_value("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn basic_keeps_padding() {
        assert_eq!(basic_header_value("a", "b"), "Basic YTpi");
        assert_eq!(basic_header_value("ab", ""), "Basic YWI6");
    }

    #[test]
    fn token_schemes() {
        assert_eq!(bearer_header_value("abc"), "Bearer abc");
        assert_eq!(api_key_header_value("k-1"), "ApiKey k-1");
    }
}
