//! Scrape coordinator - discovery strategy selection and batch orchestration
//!
//! A run moves through three discovery strategies, committing to the first
//! one that applies:
//!
//! | State | Commits when | Otherwise |
//! |-------|--------------|-----------|
//! | Manifest | manifest enabled, found, and yields at least one link | falls through |
//! | Follow | a follow selector is configured | n/a (zero links is an error) |
//! | SinglePage | always | n/a |
//!
//! The committed target list is then resolved page by page through the
//! scheduler. Per-page failures are recorded and never abort the batch.

use crate::config::ScrapeConfig;
use crate::crawler::resolver::PageResolver;
use crate::crawler::retry::RetryPolicy;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::build_http_client;
use crate::discovery::{fetch_manifest, links_from_manifest, links_from_selector, PageLink};
use crate::output::{output_dir_for, write_page, OutcomeStats, OutcomeTracker};
use crate::url::title_from_url;
use crate::{DocsmithError, Result};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Discovery strategy a run committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    Manifest,
    Follow,
    SinglePage,
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScrapeMode::Manifest => "manifest",
            ScrapeMode::Follow => "follow",
            ScrapeMode::SinglePage => "single-page",
        };
        f.write_str(name)
    }
}

/// Result of running discovery up to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub mode: ScrapeMode,

    /// Targets in discovery order
    pub links: Vec<PageLink>,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub mode: ScrapeMode,

    /// Directory the pages were (or would be) written to
    pub output_dir: PathBuf,

    pub stats: OutcomeStats,
    pub dry_run: bool,

    /// Targets in discovery order
    pub targets: Vec<PageLink>,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Arc<ScrapeConfig>,
    client: Client,
    resolver: Arc<PageResolver>,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a coordinator with a freshly built HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DocsmithError::Http)` - The HTTP client could not be built
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = build_http_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a coordinator that shares an existing HTTP client
    pub fn with_client(config: ScrapeConfig, client: Client) -> Self {
        let retry = retry_policy(&config);
        let scheduler = Scheduler::new(config.max_concurrency);
        let resolver = Arc::new(PageResolver::new(client.clone(), retry));

        Self {
            config: Arc::new(config),
            client,
            resolver,
            scheduler,
        }
    }

    /// Runs the discovery strategies until one commits
    ///
    /// # Errors
    ///
    /// * `DocsmithError::NoLinksFound` - the follow selector matched nothing
    /// * `DocsmithError::Fetch` - the follow page could not be fetched
    /// * `DocsmithError::InvalidSelector` - the follow selector does not parse
    pub async fn discover(&self) -> Result<DiscoveryOutcome> {
        let config = &self.config;
        let origin = &config.url;
        let retry = retry_policy(config);

        if config.use_manifest {
            if let Some(document) = fetch_manifest(&self.client, origin, &retry).await {
                let links = links_from_manifest(&document, origin, config.include_optional);
                if !links.is_empty() {
                    tracing::info!("Using manifest with {} pages", links.len());
                    return Ok(DiscoveryOutcome {
                        mode: ScrapeMode::Manifest,
                        links,
                    });
                }
                tracing::info!("Manifest yielded no usable links, trying next strategy");
            }
        }

        if config.follows_links() {
            let links =
                links_from_selector(&self.client, origin, &config.follow_selector, &retry).await?;
            if links.is_empty() {
                return Err(DocsmithError::NoLinksFound {
                    selector: config.follow_selector.clone(),
                    url: origin.to_string(),
                });
            }

            tracing::info!("Following {} links", links.len());
            return Ok(DiscoveryOutcome {
                mode: ScrapeMode::Follow,
                links,
            });
        }

        tracing::info!("Scraping single page {}", origin);
        Ok(DiscoveryOutcome {
            mode: ScrapeMode::SinglePage,
            links: vec![PageLink::new(origin.clone(), title_from_url(origin))],
        })
    }

    /// Runs discovery, then resolves and writes every target
    ///
    /// In dry-run mode the report is returned straight after discovery,
    /// without resolving pages or touching the filesystem.
    pub async fn run(&self) -> Result<ScrapeReport> {
        let DiscoveryOutcome { mode, links } = self.discover().await?;
        let output_dir = output_dir_for(&self.config.output_dir, &self.config.url)?;

        if self.config.dry_run {
            tracing::info!("Dry run: {} targets discovered, nothing written", links.len());
            return Ok(ScrapeReport {
                mode,
                output_dir,
                stats: OutcomeStats::new(links.len()),
                dry_run: true,
                targets: links,
            });
        }

        tokio::fs::create_dir_all(&output_dir).await?;
        tracing::info!(
            "Scraping {} pages into {} with concurrency {}",
            links.len(),
            output_dir.display(),
            self.scheduler.max_concurrency()
        );

        let tracker = Arc::new(OutcomeTracker::new(links.len()));
        let output_dir = Arc::new(output_dir);

        let tasks: Vec<_> = links
            .iter()
            .cloned()
            .map(|link| {
                let resolver = self.resolver.clone();
                let config = self.config.clone();
                let tracker = tracker.clone();
                let output_dir = output_dir.clone();
                move || async move {
                    process_page(&resolver, &config, &tracker, &output_dir, &link).await
                }
            })
            .collect();

        let results = self.scheduler.run_all(tasks).await;

        for (link, result) in links.iter().zip(results) {
            if let Err(error) = result {
                tracker.fail(link.url.as_str(), &format!("task failed: {}", error));
            }
        }

        let stats = tracker.finish();
        tracing::info!(
            "Scrape complete: {} succeeded, {} failed, {} skipped",
            stats.success,
            stats.failed,
            stats.skipped
        );

        Ok(ScrapeReport {
            mode,
            output_dir: output_dir.as_ref().clone(),
            stats,
            dry_run: false,
            targets: links,
        })
    }
}

/// Resolves and writes one page, recording exactly one outcome for it
async fn process_page(
    resolver: &PageResolver,
    config: &ScrapeConfig,
    tracker: &OutcomeTracker,
    output_dir: &Path,
    link: &PageLink,
) {
    tracker.start();

    let resolved = resolver
        .resolve(
            &link.url,
            link.is_full_content,
            &config.content_selector,
            config.use_native_markdown,
        )
        .await;

    match resolved {
        Ok(page) if page.content.trim().is_empty() => {
            tracing::warn!("Skipping {}: no content", link.url);
            tracker.skip();
        }
        Ok(page) => match write_page(output_dir, &link.title, &page.content).await {
            Ok(path) => {
                tracing::debug!("Wrote {} ({:?}) to {}", link.url, page.source, path.display());
                tracker.success();
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", link.url, e);
                tracker.fail(link.url.as_str(), &e.to_string());
            }
        },
        Err(e) => {
            tracing::error!("Failed to scrape {}: {}", link.url, e);
            tracker.fail(link.url.as_str(), &e.to_string());
        }
    }
}

fn retry_policy(config: &ScrapeConfig) -> RetryPolicy {
    RetryPolicy {
        max_retries: config.max_retries,
        base_delay_ms: config.retry_base_delay_ms,
    }
}

/// Runs discovery only, for previews and dry runs
pub async fn discover(config: ScrapeConfig) -> Result<DiscoveryOutcome> {
    Coordinator::new(config)?.discover().await
}

/// Runs a complete scrape
///
/// # Arguments
///
/// * `config` - The resolved run configuration
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - Discovery succeeded and every target was attempted
/// * `Err(DocsmithError)` - Discovery failed; no page was attempted
pub async fn scrape(config: ScrapeConfig) -> Result<ScrapeReport> {
    Coordinator::new(config)?.run().await
}
