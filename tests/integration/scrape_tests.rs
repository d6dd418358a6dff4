//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full discovery and scrape cycle end-to-end.

use docsmith::config::{load_file_config, resolve_config, DomainConfig};
use docsmith::crawler::ScrapeMode;
use docsmith::{discover, scrape, ScrapeConfig};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GUIDE_MARKDOWN: &str = "# Guide\n\nThis guide is served as Markdown straight from the docs source tree.\n";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, output: &Path) -> ScrapeConfig {
    let mut config = ScrapeConfig::new(Url::parse(&server.uri()).unwrap());
    config.output_dir = output.to_path_buf();
    config.use_native_markdown = false;
    config.content_selector = "main".to_string();
    config.max_retries = 0;
    config.retry_base_delay_ms = 1;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<!DOCTYPE html><html><body>{}</body></html>", body))
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Output directory for the mock server's host
fn site_dir(output: &Path) -> std::path::PathBuf {
    output.join("127.0.0.1")
}

#[tokio::test]
async fn test_follow_selector_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html_page(
            r#"<nav>
                <a class="nav" href="/a">A</a>
                <a class="nav" href="/b">B</a>
                <a href="/ignored">Not nav</a>
            </nav>"#,
        ),
    )
    .await;
    mount(&server, "/a", html_page("<main><h1>Page A</h1><p>Alpha</p></main>")).await;
    mount(&server, "/b", html_page("<main><h1>Page B</h1><p>Beta</p></main>")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.follow_selector = "a.nav".to_string();

    let outcome = discover(config.clone()).await.unwrap();
    assert_eq!(outcome.mode, ScrapeMode::Follow);
    let found: Vec<(String, String)> = outcome
        .links
        .iter()
        .map(|l| (l.title.clone(), l.url.to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("A".to_string(), format!("{}/a", base)),
            ("B".to_string(), format!("{}/b", base)),
        ]
    );

    let report = scrape(config).await.unwrap();
    assert_eq!(report.mode, ScrapeMode::Follow);
    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.success, 2);
    assert!(report.stats.errors.is_empty());

    let a = std::fs::read_to_string(site_dir(dir.path()).join("a.md")).unwrap();
    let b = std::fs::read_to_string(site_dir(dir.path()).join("b.md")).unwrap();
    assert!(a.contains("Page A") && a.contains("Alpha"));
    assert!(b.contains("Page B") && b.contains("Beta"));
}

#[tokio::test]
async fn test_batch_isolation() {
    let server = MockServer::start().await;

    let manifest = "# Site\n\n## Pages\n\n\
        - [One](/p1)\n- [Two](/p2)\n- [Three](/p3)\n- [Four](/p4)\n- [Five](/p5)\n";
    mount(&server, "/llms.txt", ResponseTemplate::new(200).set_body_string(manifest)).await;
    for page in ["/p1", "/p2", "/p4", "/p5"] {
        mount(&server, page, html_page("<main>Content</main>")).await;
    }
    mount(&server, "/p3", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.max_concurrency = 2;

    let report = scrape(config).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::Manifest);
    assert_eq!(report.stats.total, 5);
    assert_eq!(report.stats.completed, 5);
    assert_eq!(report.stats.success, 4);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.errors.len(), 1);
    assert!(report.stats.errors[0].url.ends_with("/p3"));
    assert!(report.stats.errors[0].message.contains("404"));

    for name in ["one", "two", "four", "five"] {
        assert!(site_dir(dir.path()).join(format!("{}.md", name)).exists());
    }
    assert!(!site_dir(dir.path()).join("three.md").exists());
}

#[tokio::test]
async fn test_manifest_optional_filtering() {
    let server = MockServer::start().await;

    let manifest = "# Site\n> About the site\n\n\
        ## Docs\n- [Install](/install): Setup\n- [Usage](/usage)\n- [Elsewhere](https://elsewhere.example/x)\n\n\
        ## optional\n- [History](/history)\n";
    mount(&server, "/llms.txt", ResponseTemplate::new(200).set_body_string(manifest)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    let outcome = discover(config.clone()).await.unwrap();
    assert_eq!(outcome.mode, ScrapeMode::Manifest);
    let titles: Vec<_> = outcome.links.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Install", "Usage"]);

    let mut with_optional = config;
    with_optional.include_optional = true;
    let outcome = discover(with_optional).await.unwrap();
    let titles: Vec<_> = outcome.links.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Install", "Usage", "History"]);
}

#[tokio::test]
async fn test_manifest_disabled_falls_back_to_single_page() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/llms.txt",
        ResponseTemplate::new(200).set_body_string("# Site\n## Docs\n- [A](/a)\n"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.use_manifest = false;

    let outcome = discover(config).await.unwrap();
    assert_eq!(outcome.mode, ScrapeMode::SinglePage);
    assert_eq!(outcome.links[0].title, "index");
}

#[tokio::test]
async fn test_native_markdown_preferred_over_html() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/docs/guide.md",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/markdown")
            .set_body_string(GUIDE_MARKDOWN),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(html_page("<main>HTML version</main>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.url = Url::parse(&format!("{}/docs/guide", server.uri())).unwrap();
    config.use_native_markdown = true;

    let report = scrape(config).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::SinglePage);
    assert_eq!(report.stats.success, 1);

    let written = std::fs::read_to_string(site_dir(dir.path()).join("guide.md")).unwrap();
    assert_eq!(written, GUIDE_MARKDOWN);
}

#[tokio::test]
async fn test_native_markdown_html_shell_rejected() {
    let server = MockServer::start().await;

    // Servers that answer every path with their app shell
    mount(&server, "/docs/guide.md", html_page("<div id=\"app\"></div>")).await;
    mount(&server, "/docs/guide/index.md", html_page("<div id=\"app\"></div>")).await;
    mount(&server, "/docs/guide", html_page("<main><p>Rendered guide</p></main>")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.url = Url::parse(&format!("{}/docs/guide", server.uri())).unwrap();
    config.use_native_markdown = true;

    let report = scrape(config).await.unwrap();
    assert_eq!(report.stats.success, 1);

    let written = std::fs::read_to_string(site_dir(dir.path()).join("guide.md")).unwrap();
    assert!(written.contains("Rendered guide"));
}

#[tokio::test]
async fn test_full_content_link_passthrough() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/llms.txt",
        ResponseTemplate::new(200).set_body_string("# Site\n## Docs\n- [Everything](/llms-full.txt)\n"),
    )
    .await;
    mount(
        &server,
        "/llms-full.txt",
        ResponseTemplate::new(200)
            .set_body_string("<SYSTEM>This is the full documentation.</SYSTEM>\n\n# All docs\n"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    let report = scrape(config).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::Manifest);
    assert!(report.targets[0].is_full_content);
    let written = std::fs::read_to_string(site_dir(dir.path()).join("everything.md")).unwrap();
    assert_eq!(written, "# All docs\n");
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount(&server, "/flaky", html_page("<main>Eventually</main>")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.url = Url::parse(&format!("{}/flaky", server.uri())).unwrap();
    config.max_retries = 3;

    let report = scrape(config).await.unwrap();

    assert_eq!(report.stats.success, 1);
    assert!(site_dir(dir.path()).join("flaky.md").exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/llms.txt",
        ResponseTemplate::new(200).set_body_string("# Site\n## Docs\n- [A](/a)\n- [B](/b)\n"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("<main>A</main>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.dry_run = true;

    let report = scrape(config).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.targets.len(), 2);
    assert_eq!(report.stats.completed, 0);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_follow_selector_without_matches_is_fatal() {
    let server = MockServer::start().await;

    mount(&server, "/", html_page("<p>No navigation</p>")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, dir.path());
    config.follow_selector = "a.nav".to_string();

    let result = scrape(config).await;

    assert!(matches!(result, Err(docsmith::DocsmithError::NoLinksFound { .. })));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_config_file_drives_scrape() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html_page(r#"<ul class="toc"><li><a href="/intro">Intro</a></li></ul>"#),
    )
    .await;
    mount(&server, "/intro", html_page("<article>Introduction text</article>")).await;

    let dir = TempDir::new().unwrap();
    let toml = format!(
        r#"
[defaults]
native-markdown = false
max-retries = 0

[domains."127.0.0.1"]
follow = "ul.toc a"
content = "article"
output = "{}"
"#,
        dir.path().display().to_string().replace('\\', "/")
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();

    let file_config = load_file_config(file.path()).unwrap();
    let config = resolve_config(&server.uri(), Some(&file_config), &DomainConfig::default(), false)
        .unwrap();

    let report = scrape(config).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::Follow);
    assert_eq!(report.stats.success, 1);
    let written = std::fs::read_to_string(site_dir(dir.path()).join("intro.md")).unwrap();
    assert!(written.contains("Introduction text"));
}
