//! Page resolver
//!
//! Turns one target URL into Markdown using the first strategy that works:
//!
//! 1. Full-content passthrough, for URLs that already denote a complete text
//!    document (manifest links to `.txt` files)
//! 2. Native Markdown probing, trying Markdown source URLs derived from the
//!    page URL
//! 3. HTML fetch, content extraction with a CSS selector, and structural
//!    conversion to Markdown

use crate::crawler::fetcher::{fetch_text, fetch_with_retry, ACCEPT_MARKDOWN, ACCEPT_TEXT};
use crate::crawler::retry::RetryPolicy;
use crate::{DocsmithError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Bodies at or below this many bytes are not accepted as native Markdown
pub const MIN_NATIVE_MARKDOWN_LEN: usize = 50;

/// Elements removed from a page before conversion
const SKIPPED_ELEMENTS: &str = "script, style, noscript, template";

/// Where a page's final content came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    FullContent,
    NativeMarkdown(Url),
    Html,
}

/// Markdown content for one page
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub content: String,
    pub source: ContentSource,
}

/// Outcome of probing for a native Markdown source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeMarkdown {
    Found { url: Url, content: String },
    NotFound,
}

/// HTML to Markdown converter
///
/// Built once per run and shared by every page task.
#[derive(Debug)]
pub struct MarkdownConverter {
    skipped: Option<Selector>,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self {
            skipped: Selector::parse(SKIPPED_ELEMENTS).ok(),
        }
    }

    /// Returns the inner markup of the first element matching `selector`
    ///
    /// Scripts, styles and similar non-content elements are removed from the
    /// document first. Returns None if nothing matches.
    pub fn extract(&self, html: &str, selector: &Selector) -> Option<String> {
        let mut document = Html::parse_document(html);

        if let Some(skipped) = &self.skipped {
            let ids: Vec<_> = document.select(skipped).map(|element| element.id()).collect();
            for id in ids {
                if let Some(mut node) = document.tree.get_mut(id) {
                    node.detach();
                }
            }
        }

        document
            .select(selector)
            .next()
            .map(|element| element.inner_html())
    }

    /// Converts HTML markup to Markdown
    pub fn convert(&self, markup: &str) -> String {
        html2md::parse_html(markup).trim().to_string()
    }
}

/// Resolves target URLs to Markdown content
pub struct PageResolver {
    client: Client,
    converter: MarkdownConverter,
    retry: RetryPolicy,
}

impl PageResolver {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            converter: MarkdownConverter::new(),
            retry,
        }
    }

    /// Resolves one page
    ///
    /// # Errors
    ///
    /// * `DocsmithError::Fetch` - the full-content or HTML fetch failed after retries
    /// * `DocsmithError::SelectorNotFound` - the content selector matched nothing
    /// * `DocsmithError::InvalidSelector` - the content selector does not parse
    pub async fn resolve(
        &self,
        url: &Url,
        is_full_content: bool,
        content_selector: &str,
        use_native_markdown: bool,
    ) -> Result<ResolvedPage> {
        if is_full_content {
            let content = self.fetch_full_content(url).await?;
            return Ok(ResolvedPage {
                content,
                source: ContentSource::FullContent,
            });
        }

        if use_native_markdown {
            if let NativeMarkdown::Found { url: source, content } =
                self.probe_native_markdown(url).await
            {
                tracing::debug!("Using native Markdown for {} from {}", url, source);
                return Ok(ResolvedPage {
                    content,
                    source: ContentSource::NativeMarkdown(source),
                });
            }
            tracing::debug!("No native Markdown for {}, falling back to HTML", url);
        }

        let content = self.fetch_html_as_markdown(url, content_selector).await?;
        Ok(ResolvedPage {
            content,
            source: ContentSource::Html,
        })
    }

    /// Fetches a complete text document and strips system directive blocks
    pub async fn fetch_full_content(&self, url: &Url) -> Result<String> {
        let body = fetch_with_retry(&self.client, url, Some(ACCEPT_TEXT), &self.retry).await?;
        Ok(strip_system_directives(&body))
    }

    /// Probes each native Markdown candidate once, in order
    ///
    /// Failures of any kind just move on to the next candidate.
    pub async fn probe_native_markdown(&self, url: &Url) -> NativeMarkdown {
        for candidate in native_markdown_candidates(url) {
            match fetch_text(&self.client, &candidate, Some(ACCEPT_MARKDOWN)).await {
                Ok(response) if response.is_success() && looks_like_markdown(&response.body) => {
                    return NativeMarkdown::Found {
                        url: candidate,
                        content: response.body,
                    };
                }
                Ok(response) => {
                    tracing::trace!("Rejected candidate {} ({})", candidate, response.status);
                }
                Err(failure) => {
                    tracing::trace!("Candidate {} failed: {}", candidate, failure);
                }
            }
        }

        NativeMarkdown::NotFound
    }

    /// Fetches a page as HTML, extracts the content element and converts it
    pub async fn fetch_html_as_markdown(&self, url: &Url, content_selector: &str) -> Result<String> {
        let selector = parse_selector(content_selector)?;
        let html = fetch_with_retry(&self.client, url, None, &self.retry).await?;

        let markup = self.converter.extract(&html, &selector).ok_or_else(|| {
            DocsmithError::SelectorNotFound {
                selector: content_selector.to_string(),
                url: url.to_string(),
            }
        })?;

        Ok(self.converter.convert(&markup))
    }
}

/// Parses a CSS selector, mapping failures to `DocsmithError::InvalidSelector`
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| DocsmithError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// Derives the ordered list of native Markdown source URLs for a page
///
/// | Page path | Candidates |
/// |-----------|------------|
/// | `/docs/page.html` | `/docs/page.md`, `/docs/page.html.md` |
/// | `/docs/guide/` | `/docs/guide/index.md`, `/docs/guide.md` |
/// | `/docs/guide` | `/docs/guide.md`, `/docs/guide/index.md` |
///
/// Query strings and fragments are dropped.
///
/// # Example
///
/// ```
/// use docsmith::crawler::native_markdown_candidates;
/// use url::Url;
///
/// let url = Url::parse("https://x.test/docs/guide").unwrap();
/// let candidates: Vec<String> = native_markdown_candidates(&url)
///     .iter()
///     .map(|u| u.path().to_string())
///     .collect();
/// assert_eq!(candidates, vec!["/docs/guide.md", "/docs/guide/index.md"]);
/// ```
pub fn native_markdown_candidates(url: &Url) -> Vec<Url> {
    let path = url.path();
    let last_segment = path.rsplit('/').next().unwrap_or("");
    let mut paths = Vec::new();

    match last_segment.rfind('.') {
        Some(dot) if dot > 0 => {
            let stem_end = path.len() - last_segment.len() + dot;
            paths.push(format!("{}.md", &path[..stem_end]));
            paths.push(format!("{}.md", path));
        }
        _ => {
            let has_trailing_slash = path.ends_with('/');
            if has_trailing_slash {
                paths.push(format!("{}index.md", path));
            }
            let trimmed = path.trim_end_matches('/');
            if !trimmed.is_empty() {
                paths.push(format!("{}.md", trimmed));
            }
            if !has_trailing_slash {
                paths.push(format!("{}/index.md", path));
            }
        }
    }

    paths
        .into_iter()
        .map(|candidate_path| {
            let mut candidate = url.clone();
            candidate.set_path(&candidate_path);
            candidate.set_query(None);
            candidate.set_fragment(None);
            candidate
        })
        .collect()
}

/// Returns true if a body is acceptable as native Markdown
///
/// Rejects HTML documents (servers that answer every path with their SPA
/// shell) and bodies too short to be a real page.
pub fn looks_like_markdown(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(32).collect::<String>().to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return false;
    }
    body.trim().len() > MIN_NATIVE_MARKDOWN_LEN
}

/// Removes `<SYSTEM>...</SYSTEM>` blocks from a text document
///
/// Full-content documents often open with such a block addressed to language
/// models. Tags match case-insensitively; an unclosed tag is left alone.
///
/// # Example
///
/// ```
/// use docsmith::crawler::strip_system_directives;
///
/// let body = "<SYSTEM>This is the full documentation.</SYSTEM>\n\n# Guide";
/// assert_eq!(strip_system_directives(body), "# Guide");
/// ```
pub fn strip_system_directives(body: &str) -> String {
    const OPEN: &str = "<system>";
    const CLOSE: &str = "</system>";

    let mut result = body.to_string();
    let mut search_from = 0;

    loop {
        let lower = result.to_ascii_lowercase();
        let Some(start) = lower[search_from..].find(OPEN).map(|i| i + search_from) else {
            break;
        };
        let Some(end) = lower[start..].find(CLOSE).map(|i| i + start + CLOSE.len()) else {
            break;
        };
        result.replace_range(start..end, "");
        search_from = start;
    }

    result.trim().to_string()
}
