use crate::crawler::{fetch_text, with_retry, RetryPolicy, ACCEPT_TEXT, RETRYABLE_SIGNATURES};
use crate::discovery::PageLink;
use crate::manifest::{parse_manifest, ManifestDocument};
use crate::url::{is_same_host, resolve_href};
use reqwest::Client;
use url::Url;

/// Path extensions marking a URL as a complete text document
const FULL_CONTENT_EXTENSIONS: &[&str] = &[".txt"];

/// Summary of a site's manifest, for previews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCheck {
    /// Where the manifest was looked for
    pub url: Url,

    pub found: bool,
    pub title: Option<String>,
    pub section_count: usize,
    pub link_count: usize,

    /// Links that would be scraped, optional sections included
    pub same_host_link_count: usize,
}

/// Returns `{origin}/llms.txt` for any URL on the site
pub fn manifest_url(origin: &Url) -> Url {
    let mut url = origin.clone();
    url.set_path("/llms.txt");
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Returns true if the URL path ends in a plain-text extension
pub fn is_full_content_url(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    FULL_CONTENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Flattens a manifest into scrape targets
///
/// # Filtering Rules
///
/// - Sections titled "Optional" are skipped unless `include_optional` is set
/// - Links that fail to resolve against `origin` are skipped
/// - Links on a different host than `origin` are skipped
///
/// Skipped links are not errors. Document order is preserved.
pub fn links_from_manifest(
    document: &ManifestDocument,
    origin: &Url,
    include_optional: bool,
) -> Vec<PageLink> {
    let mut links = Vec::new();

    for section in &document.sections {
        if section.is_optional && !include_optional {
            tracing::debug!(
                "Skipping optional section '{}' ({} links)",
                section.title,
                section.links.len()
            );
            continue;
        }

        for link in &section.links {
            let Some(url) = resolve_href(&link.url, origin) else {
                tracing::debug!("Skipping unresolvable manifest link: {}", link.url);
                continue;
            };

            if !is_same_host(&url, origin) {
                tracing::debug!("Skipping cross-origin manifest link: {}", url);
                continue;
            }

            links.push(PageLink::new(url, link.title.clone()));
        }
    }

    links
}

/// Fetches and parses `{origin}/llms.txt`
///
/// Returns None when the manifest is absent, answers with a non-success
/// status, or cannot be fetched after retries. None of these are errors.
pub async fn fetch_manifest(
    client: &Client,
    origin: &Url,
    policy: &RetryPolicy,
) -> Option<ManifestDocument> {
    let url = manifest_url(origin);

    let response = match with_retry(
        || fetch_text(client, &url, Some(ACCEPT_TEXT)),
        policy.max_retries,
        policy.base_delay_ms,
        Some(RETRYABLE_SIGNATURES),
    )
    .await
    {
        Ok(response) => response,
        Err(failure) => {
            tracing::debug!("Manifest fetch failed for {}: {}", url, failure);
            return None;
        }
    };

    if !response.is_success() {
        tracing::debug!("No manifest at {} ({})", url, response.status);
        return None;
    }

    let document = parse_manifest(&response.body);
    tracing::info!(
        "Found manifest at {} with {} sections and {} links",
        url,
        document.sections.len(),
        document.link_count()
    );
    Some(document)
}

/// Looks up a site's manifest and summarizes it
pub async fn inspect_manifest(client: &Client, origin: &Url, policy: &RetryPolicy) -> ManifestCheck {
    let url = manifest_url(origin);

    match fetch_manifest(client, origin, policy).await {
        Some(document) => ManifestCheck {
            url,
            found: true,
            title: Some(document.title.clone()).filter(|t| !t.is_empty()),
            section_count: document.sections.len(),
            link_count: document.link_count(),
            same_host_link_count: links_from_manifest(&document, origin, true).len(),
        },
        None => ManifestCheck {
            url,
            found: false,
            title: None,
            section_count: 0,
            link_count: 0,
            same_host_link_count: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MANIFEST: &str = "# Docs
## Guides
- [Intro](/intro)
- [Setup](https://docs.example/setup.html): Install steps
- [Elsewhere](https://other.example/page)
## Optional
- [Full](/llms-full.txt)
- [Blog](https://blog.example/post)
";

    fn origin() -> Url {
        Url::parse("https://docs.example/").unwrap()
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 0,
            base_delay_ms: 1,
        }
    }

    #[test]
    fn test_manifest_url_from_deep_page() {
        let url = Url::parse("https://docs.example/guide/intro?x=1#top").unwrap();
        assert_eq!(manifest_url(&url).as_str(), "https://docs.example/llms.txt");
    }

    #[test]
    fn test_full_content_detection() {
        assert!(is_full_content_url(
            &Url::parse("https://docs.example/llms-full.txt").unwrap()
        ));
        assert!(is_full_content_url(
            &Url::parse("https://docs.example/GUIDE.TXT").unwrap()
        ));
        assert!(!is_full_content_url(
            &Url::parse("https://docs.example/guide.html").unwrap()
        ));
    }

    #[test]
    fn test_excludes_optional_by_default() {
        let doc = parse_manifest(MANIFEST);
        let links = links_from_manifest(&doc, &origin(), false);

        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Setup"]);
        assert_eq!(links[0].url.as_str(), "https://docs.example/intro");
        assert!(!links[0].is_full_content);
    }

    #[test]
    fn test_includes_optional_when_asked() {
        let doc = parse_manifest(MANIFEST);
        let links = links_from_manifest(&doc, &origin(), true);

        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Setup", "Full"]);
        assert!(links[2].is_full_content);
    }

    #[test]
    fn test_malformed_manifest_url_skipped() {
        let doc = parse_manifest("## Docs\n- [First](/first)\n- [Bad](http://[bad)\n- [Last](/last)\n");
        assert_eq!(doc.link_count(), 3);

        let links = links_from_manifest(&doc, &origin(), false);

        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Last"]);
        assert_eq!(links[1].url.as_str(), "https://docs.example/last");
    }

    #[test]
    fn test_optional_section_case_insensitive() {
        let doc = parse_manifest("## OPTIONAL\n- [A](/a)\n## Main\n- [B](/b)\n");
        assert_eq!(links_from_manifest(&doc, &origin(), false).len(), 1);
        assert_eq!(links_from_manifest(&doc, &origin(), true).len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_manifest_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/llms.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let origin = Url::parse(&format!("{}/docs/", server.uri())).unwrap();
        let doc = fetch_manifest(&client, &origin, &policy()).await.unwrap();

        assert_eq!(doc.title, "Docs");
        assert_eq!(doc.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_manifest_missing() {
        let server = MockServer::start().await;

        let client = build_http_client().unwrap();
        let origin = Url::parse(&server.uri()).unwrap();

        assert!(fetch_manifest(&client, &origin, &policy()).await.is_none());
    }

    #[tokio::test]
    async fn test_inspect_manifest_counts() {
        let server = MockServer::start().await;
        let body = "# Site\n## Docs\n- [A](/a)\n- [B](https://other.example/b)\n";
        Mock::given(method("GET"))
            .and(path("/llms.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let origin = Url::parse(&server.uri()).unwrap();
        let check = inspect_manifest(&client, &origin, &policy()).await;

        assert!(check.found);
        assert_eq!(check.title.as_deref(), Some("Site"));
        assert_eq!(check.section_count, 1);
        assert_eq!(check.link_count, 2);
        assert_eq!(check.same_host_link_count, 1);
    }
}
