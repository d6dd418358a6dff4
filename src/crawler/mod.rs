//! Crawler module for page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching and the retry executor
//! - Page resolution to Markdown
//! - Bounded-concurrency scheduling
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod resolver;
mod retry;
mod scheduler;

pub use coordinator::{discover, scrape, Coordinator, DiscoveryOutcome, ScrapeMode, ScrapeReport};
pub use fetcher::{
    build_http_client, fetch_success, fetch_text, fetch_with_retry, FetchFailure, FetchResponse,
    ACCEPT_MARKDOWN, ACCEPT_TEXT,
};
pub use resolver::{
    looks_like_markdown, native_markdown_candidates, parse_selector, strip_system_directives,
    ContentSource, MarkdownConverter, NativeMarkdown, PageResolver, ResolvedPage,
    MIN_NATIVE_MARKDOWN_LEN,
};
pub use retry::{backoff_delay, is_retryable, with_retry, RetryPolicy, RETRYABLE_SIGNATURES};
pub use scheduler::Scheduler;

use crate::discovery::{inspect_manifest, links_from_selector, ManifestCheck, PageLink};
use crate::Result;
use reqwest::Client;
use url::Url;

/// Fetches a page and returns the links matching a CSS selector
///
/// This is raw link extraction, without the discovery state machine. The
/// page fetch uses the default retry policy.
///
/// # Arguments
///
/// * `client` - HTTP client from [`build_http_client`]
/// * `url` - Page to extract links from
/// * `selector` - CSS selector for the anchors to collect
///
/// # Returns
///
/// * `Ok(Vec<PageLink>)` - Matching links in document order, possibly empty
/// * `Err(DocsmithError)` - The selector is invalid or the page could not be fetched
pub async fn extract_links(client: &Client, url: &Url, selector: &str) -> Result<Vec<PageLink>> {
    links_from_selector(client, url, selector, &RetryPolicy::default()).await
}

/// Looks for `{origin}/llms.txt` and summarizes what it contains
///
/// A missing manifest is reported through `ManifestCheck::found`, not as an error.
pub async fn check_manifest(client: &Client, origin: &Url) -> ManifestCheck {
    inspect_manifest(client, origin, &RetryPolicy::default()).await
}
