use crate::crawler::{fetch_with_retry, parse_selector, RetryPolicy};
use crate::discovery::PageLink;
use crate::url::resolve_href;
use crate::Result;
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Href fragments that mark build assets and other non-content files
pub const EXCLUDED_PATH_FRAGMENTS: &[&str] = &[
    "/_next/",
    "/static/",
    "/assets/",
    "/_astro/",
    "sitemap",
    "favicon",
];

/// Fetches `page_url` and collects the links matching `selector`
///
/// # Errors
///
/// * `DocsmithError::InvalidSelector` - the selector does not parse
/// * `DocsmithError::Fetch` - the page could not be fetched after retries
pub async fn links_from_selector(
    client: &Client,
    page_url: &Url,
    selector: &str,
    policy: &RetryPolicy,
) -> Result<Vec<PageLink>> {
    // Fail on a bad selector before touching the network
    parse_selector(selector)?;

    let html = fetch_with_retry(client, page_url, None, policy).await?;
    let links = extract_selector_links(&html, page_url, selector)?;

    tracing::info!(
        "Selector '{}' matched {} links on {}",
        selector,
        links.len(),
        page_url
    );
    Ok(links)
}

/// Collects links matching `selector` from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:** elements with a non-empty `href` and non-empty trimmed text.
///
/// **Exclude:**
/// - hrefs containing any of [`EXCLUDED_PATH_FRAGMENTS`]
/// - hrefs that do not resolve to an HTTP(S) URL
/// - repeats of an absolute URL already collected (first one wins)
///
/// # Example
///
/// ```
/// use docsmith::discovery::extract_selector_links;
/// use url::Url;
///
/// let html = r#"<nav><a class="nav" href="/a">A</a><a class="nav" href="/a">Again</a></nav>"#;
/// let base = Url::parse("https://docs.example/").unwrap();
/// let links = extract_selector_links(html, &base, "a.nav").unwrap();
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].title, "A");
/// ```
pub fn extract_selector_links(html: &str, base_url: &Url, selector: &str) -> Result<Vec<PageLink>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };
        let text = element.text().collect::<String>();
        let title = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if href.is_empty() || title.is_empty() {
            continue;
        }

        if EXCLUDED_PATH_FRAGMENTS.iter().any(|f| href.contains(f)) {
            tracing::trace!("Skipping non-content link: {}", href);
            continue;
        }

        let Some(url) = resolve_href(href, base_url) else {
            continue;
        };

        if seen.insert(url.to_string()) {
            links.push(PageLink {
                url,
                title,
                is_full_content: false,
            });
        }
    }

    Ok(links)
}
