use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    #[error("Article has no URL")]
    Missing,
    #[error("Invalid article URL: {0}")]
    Invalid(String),
    #[error("Refusing to open {0} link")]
    UnsupportedScheme(String),
}

/// Check that an article link is safe to pass to the system opener.
///
/// Only `http` and `https` URLs with a host are accepted; anything else
/// (`file:`, `javascript:`, custom handlers) is rejected.
pub fn validate_url_for_open(raw: &str) -> Result<Url, LinkError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LinkError::Missing);
    }

    let url = Url::parse(raw).map_err(|e| LinkError::Invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(LinkError::UnsupportedScheme(other.to_string())),
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(LinkError::Invalid("missing host".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_web_links() {
        assert!(validate_url_for_open("https://news.example.com/a/1").is_ok());
        assert!(validate_url_for_open(" http://example.com ").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_url_for_open("file:///etc/passwd"),
            Err(LinkError::UnsupportedScheme("file".to_string()))
        );
        assert!(matches!(
            validate_url_for_open("javascript:alert(1)"),
            Err(LinkError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_missing_and_garbage() {
        assert_eq!(validate_url_for_open("   "), Err(LinkError::Missing));
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(LinkError::Invalid(_))
        ));
    }
}
