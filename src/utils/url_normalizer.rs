//! URL normalization for reputation keys.
//!
//! Equivalent spellings of a URL must map to one cache key, otherwise every
//! variant costs its own upstream query.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a URL to the form used as a reputation cache key.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Only `http` and `https` are accepted
/// 3. The host is lowercased (done by the parser) and a trailing dot removed
/// 4. Default ports (80, 443) and fragments are dropped
/// 5. Path and query are kept as given
///
/// # Errors
///
/// - [`UrlNormalizationError::InvalidFormat`] for malformed URLs
/// - [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes
/// - [`UrlNormalizationError::MissingHost`] if no host is present
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_string();

    if let Some(stripped) = host.strip_suffix('.') {
        url.set_host(Some(stripped))
            .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;
    }

    // The parser already drops default ports for special schemes.
    url.set_fragment(None);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_host_and_keeps_path_case() {
        assert_eq!(
            normalize_url("HTTPS://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_adds_root_path() {
        assert_eq!(
            normalize_url("http://evil.example").unwrap(),
            "http://evil.example/"
        );
    }

    #[test]
    fn test_drops_default_port_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com:443/page?q=1#section").unwrap(),
            "https://example.com/page?q=1"
        );
        assert_eq!(
            normalize_url("http://example.com:80/").unwrap(),
            "http://example.com/"
        );
    }

    #[test]
    fn test_keeps_custom_port() {
        assert_eq!(
            normalize_url("http://example.com:8080/x").unwrap(),
            "http://example.com:8080/x"
        );
    }

    #[test]
    fn test_strips_trailing_dot_and_whitespace() {
        assert_eq!(
            normalize_url("  http://example.com./a  ").unwrap(),
            "http://example.com/a"
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in ["javascript:alert(1)", "ftp://example.com/", "file:///etc/passwd"] {
            assert!(matches!(
                normalize_url(input),
                Err(UrlNormalizationError::UnsupportedProtocol)
            ));
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
        assert!(matches!(
            normalize_url(""),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }
}
