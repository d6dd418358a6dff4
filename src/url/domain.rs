use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docsmith::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the lowercase host of a URL with any leading `www.` removed
///
/// This names the per-site output directory and is the second key tried when
/// looking up a site's config table.
pub fn host_without_www(url: &Url) -> Option<String> {
    extract_domain(url).map(|host| match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// Returns true if both URLs have the same host
///
/// Ports and schemes are not compared. A URL without a host never matches.
pub fn is_same_host(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_host_without_www() {
        let url = Url::parse("https://www.docs.example/guide").unwrap();
        assert_eq!(host_without_www(&url), Some("docs.example".to_string()));
    }

    #[test]
    fn test_host_without_www_keeps_other_subdomains() {
        let url = Url::parse("https://api.docs.example/").unwrap();
        assert_eq!(host_without_www(&url), Some("api.docs.example".to_string()));
    }

    #[test]
    fn test_same_host_ignores_port_and_case() {
        let a = Url::parse("https://Docs.Example:8443/a").unwrap();
        let b = Url::parse("http://docs.example/b").unwrap();
        assert!(is_same_host(&a, &b));
    }

    #[test]
    fn test_different_host() {
        let a = Url::parse("https://docs.example/a").unwrap();
        let b = Url::parse("https://cdn.example/b").unwrap();
        assert!(!is_same_host(&a, &b));
    }

    #[test]
    fn test_www_is_a_different_host() {
        let a = Url::parse("https://www.docs.example/").unwrap();
        let b = Url::parse("https://docs.example/").unwrap();
        assert!(!is_same_host(&a, &b));
    }
}
