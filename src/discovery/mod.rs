//! Link discovery
//!
//! Produces the list of pages to scrape. Two independent strategies exist:
//! - manifest-derived, flattening a parsed `llms.txt` into same-host links
//! - selector-driven, collecting anchors matching a CSS selector on one page

mod manifest;
mod selector;

pub use manifest::{
    fetch_manifest, inspect_manifest, is_full_content_url, links_from_manifest, manifest_url,
    ManifestCheck,
};
pub use selector::{extract_selector_links, links_from_selector, EXCLUDED_PATH_FRAGMENTS};

use url::Url;

/// A discovered page to scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute URL of the page
    pub url: Url,

    /// Title used to derive the output file name
    pub title: String,

    /// True if the URL is a complete pre-rendered text document
    pub is_full_content: bool,
}

impl PageLink {
    pub fn new(url: Url, title: impl Into<String>) -> Self {
        let is_full_content = is_full_content_url(&url);
        Self {
            url,
            title: title.into(),
            is_full_content,
        }
    }
}
