//! URL helpers
//!
//! Plain string manipulation; no parsing or normalization beyond slash
//! handling at the base/path seam.

/// Whether `url` starts with a `scheme://` prefix.
pub fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Prefix `url` with `base` unless `url` is already absolute.
///
/// Exactly one `/` separates the two parts.
pub fn join_base_url(base: Option<&str>, url: &str) -> String {
    match base {
        Some(base) if !base.is_empty() && !is_absolute_url(url) => {
            if url.is_empty() {
                return base.to_string();
            }
            format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
        }
        _ => url.to_string(),
    }
}

/// Append percent-encoded `key=value` pairs in the given order.
///
/// An existing query string is extended with `&`.
pub fn append_query<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let encoded = params
        .into_iter()
        .map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key.as_ref()), urlencoding::encode(value.as_ref()))
        })
        .collect::<Vec<_>>()
        .join("&");

    if encoded.is_empty() {
        return url.to_string();
    }

    let separator = match url.find('?') {
        None => "?",
        Some(_) if url.ends_with('?') || url.ends_with('&') => "",
        Some(_) => "&",
    };
    format!("{url}{separator}{encoded}")
}
