use crate::UrlError;
use url::Url;

/// Parses and validates a crawl origin URL
///
/// # Rules
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` schemes are accepted
/// 3. The URL must have a host
///
/// # Examples
///
/// ```
/// use docsmith::url::parse_origin;
///
/// let url = parse_origin("https://docs.example/guide/").unwrap();
/// assert_eq!(url.host_str(), Some("docs.example"));
///
/// assert!(parse_origin("ftp://docs.example/").is_err());
/// ```
pub fn parse_origin(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves a link href against a base URL
///
/// Returns None if the link cannot be turned into a fetchable page:
/// - empty hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that fail to parse against the base
/// - non-HTTP(S) URLs after resolution
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://docs.example/guide/intro").unwrap()
    }

    #[test]
    fn test_parse_origin_accepts_http() {
        assert!(parse_origin("http://127.0.0.1:8080/").is_ok());
    }

    #[test]
    fn test_parse_origin_trims_whitespace() {
        let url = parse_origin("  https://docs.example/  ").unwrap();
        assert_eq!(url.as_str(), "https://docs.example/");
    }

    #[test]
    fn test_parse_origin_rejects_garbage() {
        assert!(matches!(parse_origin("not a url"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_parse_origin_rejects_scheme() {
        assert!(matches!(
            parse_origin("file:///etc/passwd"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolved = resolve_href("/api", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://docs.example/api");
    }

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_href("setup", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://docs.example/guide/setup");
    }

    #[test]
    fn test_resolve_skips_special_schemes() {
        assert!(resolve_href("javascript:void(0)", &base_url()).is_none());
        assert!(resolve_href("mailto:docs@example.com", &base_url()).is_none());
        assert!(resolve_href("tel:+1234", &base_url()).is_none());
        assert!(resolve_href("   ", &base_url()).is_none());
    }

    #[test]
    fn test_resolve_keeps_cross_origin() {
        let resolved = resolve_href("https://other.example/x", &base_url()).unwrap();
        assert_eq!(resolved.host_str(), Some("other.example"));
    }
}
