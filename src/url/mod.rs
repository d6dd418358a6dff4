//! URL handling module for Docsmith
//!
//! This module provides origin parsing, host extraction and comparison, and
//! the derivation of page titles from URL paths.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, host_without_www, is_same_host};
pub use normalize::{parse_origin, resolve_href};

use url::Url;

/// Derives a page title from the last non-empty path segment of a URL
///
/// Used for single-page mode, where no link text is available. Returns
/// `"index"` when the path has no non-empty segments.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docsmith::url::title_from_url;
///
/// let url = Url::parse("https://docs.example/guide/install/").unwrap();
/// assert_eq!(title_from_url(&url), "install");
///
/// let url = Url::parse("https://docs.example/").unwrap();
/// assert_eq!(title_from_url(&url), "index");
/// ```
pub fn title_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "index".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_nested_path() {
        let url = Url::parse("https://docs.example/docs/guide").unwrap();
        assert_eq!(title_from_url(&url), "guide");
    }

    #[test]
    fn test_title_ignores_trailing_slash() {
        let url = Url::parse("https://docs.example/docs/guide/").unwrap();
        assert_eq!(title_from_url(&url), "guide");
    }

    #[test]
    fn test_title_for_root() {
        let url = Url::parse("https://docs.example").unwrap();
        assert_eq!(title_from_url(&url), "index");
    }

    #[test]
    fn test_title_keeps_extension() {
        let url = Url::parse("https://docs.example/api.html").unwrap();
        assert_eq!(title_from_url(&url), "api.html");
    }
}
