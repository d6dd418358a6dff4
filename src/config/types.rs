use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Default content-extraction selector
pub const DEFAULT_CONTENT_SELECTOR: &str = "body";

/// Default output root directory
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Resolved settings for one scrape run
///
/// Built once from built-in defaults, the config file and CLI flags, then
/// left untouched for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Origin URL the run starts from
    pub url: Url,

    /// Selector for links to follow; empty disables follow mode
    pub follow_selector: String,

    /// Selector for the element holding page content
    pub content_selector: String,

    /// Root directory for output files
    pub output_dir: PathBuf,

    pub use_native_markdown: bool,
    pub use_manifest: bool,
    pub include_optional: bool,
    pub dry_run: bool,

    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub max_concurrency: usize,
}

impl ScrapeConfig {
    /// Creates a configuration with built-in defaults for the given origin
    pub fn new(url: Url) -> Self {
        Self {
            url,
            follow_selector: String::new(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            use_native_markdown: true,
            use_manifest: true,
            include_optional: false,
            dry_run: false,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Applies every field set in `layer`, leaving the others untouched
    pub fn apply(&mut self, layer: &DomainConfig) {
        if let Some(follow) = &layer.follow {
            self.follow_selector = follow.trim().to_string();
        }
        if let Some(content) = &layer.content {
            self.content_selector = content.trim().to_string();
        }
        if let Some(output) = &layer.output {
            self.output_dir = output.clone();
        }
        if let Some(native) = layer.native_markdown {
            self.use_native_markdown = native;
        }
        if let Some(manifest) = layer.manifest {
            self.use_manifest = manifest;
        }
        if let Some(include) = layer.include_optional {
            self.include_optional = include;
        }
        if let Some(retries) = layer.max_retries {
            self.max_retries = retries;
        }
        if let Some(delay) = layer.retry_delay {
            self.retry_base_delay_ms = delay;
        }
        if let Some(concurrency) = layer.concurrency {
            self.max_concurrency = concurrency;
        }
    }

    /// Returns true if follow mode is configured
    pub fn follows_links(&self) -> bool {
        !self.follow_selector.is_empty()
    }
}

/// Per-site settings, every field optional
///
/// Used for `[defaults]` and `[domains."<host>"]` tables in the config file,
/// and for CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// CSS selector for links to follow
    pub follow: Option<String>,

    /// CSS selector for page content
    pub content: Option<String>,

    /// Output root directory
    pub output: Option<PathBuf>,

    #[serde(rename = "native-markdown")]
    pub native_markdown: Option<bool>,

    pub manifest: Option<bool>,

    #[serde(rename = "include-optional")]
    pub include_optional: Option<bool>,

    #[serde(rename = "max-retries")]
    pub max_retries: Option<u32>,

    /// Base retry delay (milliseconds)
    #[serde(rename = "retry-delay")]
    pub retry_delay: Option<u64>,

    pub concurrency: Option<usize>,
}

/// Contents of a TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Settings applied to every site
    #[serde(default)]
    pub defaults: DomainConfig,

    /// Settings keyed by hostname
    #[serde(default)]
    pub domains: HashMap<String, DomainConfig>,
}

impl FileConfig {
    /// Looks up a site's table by exact hostname, then without `www.`
    pub fn domain(&self, host: &str) -> Option<&DomainConfig> {
        let host = host.to_lowercase();
        self.domains
            .get(&host)
            .or_else(|| host.strip_prefix("www.").and_then(|bare| self.domains.get(bare)))
    }
}
