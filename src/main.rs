//! Docsmith main entry point
//!
//! This is the command-line interface for the Docsmith documentation scraper.

use clap::Parser;
use docsmith::config::{load_file_config_with_hash, resolve_config, DomainConfig};
use docsmith::crawler::{build_http_client, check_manifest, extract_links, scrape};
use docsmith::output::print_summary;
use docsmith::url::parse_origin;
use docsmith::ScrapeConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docsmith: documentation sites to Markdown
///
/// Docsmith discovers the pages of a documentation site from its llms.txt
/// manifest, from links matching a CSS selector, or as a single page, and
/// writes each page to disk as Markdown.
#[derive(Parser, Debug)]
#[command(name = "docsmith")]
#[command(version = "1.0.0")]
#[command(about = "Scrape documentation sites to Markdown", long_about = None)]
struct Cli {
    /// Documentation site or page to scrape
    #[arg(value_name = "URL")]
    url: String,

    /// CSS selector for links to follow from the start page
    #[arg(long, value_name = "SELECTOR")]
    follow: Option<String>,

    /// CSS selector for the element holding page content [default: body]
    #[arg(long, value_name = "SELECTOR")]
    content: Option<String>,

    /// Root directory for output files [default: ./output]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not probe for native Markdown sources
    #[arg(long)]
    no_native_markdown: bool,

    /// Do not use the site's llms.txt manifest
    #[arg(long)]
    no_manifest: bool,

    /// Include the manifest's "Optional" section
    #[arg(long)]
    include_optional: bool,

    /// Show what would be scraped without fetching pages or writing files
    #[arg(long, conflicts_with_all = ["check_manifest", "extract_links"])]
    dry_run: bool,

    /// Report on the site's llms.txt manifest and exit
    #[arg(long, conflicts_with_all = ["dry_run", "extract_links"])]
    check_manifest: bool,

    /// Print the links matching a CSS selector on the page and exit
    #[arg(long, value_name = "SELECTOR", conflicts_with_all = ["dry_run", "check_manifest"])]
    extract_links: Option<String>,

    /// Retries per request after the first attempt
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Base retry delay in milliseconds, doubled on each retry
    #[arg(long, value_name = "MS")]
    retry_delay: Option<u64>,

    /// Maximum pages processed at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Collects the flags that were given into a config layer
    fn overrides(&self) -> DomainConfig {
        DomainConfig {
            follow: self.follow.clone(),
            content: self.content.clone(),
            output: self.output.clone(),
            native_markdown: self.no_native_markdown.then_some(false),
            manifest: self.no_manifest.then_some(false),
            include_optional: self.include_optional.then_some(true),
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            concurrency: self.concurrency,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.check_manifest {
        return handle_check_manifest(&cli.url).await;
    }
    if let Some(selector) = &cli.extract_links {
        return handle_extract_links(&cli.url, selector).await;
    }

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_file_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Some(config)
        }
        None => None,
    };

    let config = resolve_config(
        &cli.url,
        file_config.as_ref(),
        &cli.overrides(),
        cli.dry_run,
    )?;

    if config.dry_run {
        handle_dry_run(config).await
    } else {
        handle_scrape(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docsmith=info,warn"),
            1 => EnvFilter::new("docsmith=debug,info"),
            2 => EnvFilter::new("docsmith=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the resolved configuration
fn print_config(config: &ScrapeConfig) {
    println!("Configuration:");
    println!("  URL: {}", config.url);
    if config.follows_links() {
        println!("  Follow selector: {}", config.follow_selector);
    }
    println!("  Content selector: {}", config.content_selector);
    println!("  Output root: {}", config.output_dir.display());
    println!("  Native Markdown: {}", config.use_native_markdown);
    println!("  Manifest: {}", config.use_manifest);
    println!("  Include optional: {}", config.include_optional);
    println!("  Max retries: {}", config.max_retries);
    println!("  Retry delay: {}ms", config.retry_base_delay_ms);
    println!("  Concurrency: {}", config.max_concurrency);
}

/// Handles the --dry-run mode: shows the configuration and discovered targets
async fn handle_dry_run(config: ScrapeConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Docsmith Dry Run ===\n");
    print_config(&config);

    let report = scrape(config).await?;

    println!("\nMode: {}", report.mode);
    println!("Output directory: {}", report.output_dir.display());
    println!("\nTargets ({}):", report.targets.len());
    for link in &report.targets {
        let marker = if link.is_full_content { " [full]" } else { "" };
        println!("  - {} -> {}{}", link.title, link.url, marker);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} pages", report.targets.len());

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: ScrapeConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting scrape of {}", config.url);

    let report = scrape(config).await?;

    println!("Mode: {}", report.mode);
    println!("Output directory: {}\n", report.output_dir.display());
    print_summary(&report.stats);

    Ok(())
}

/// Handles the --check-manifest mode
async fn handle_check_manifest(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let origin = parse_origin(url)?;
    let client = build_http_client()?;

    let check = check_manifest(&client, &origin).await;

    println!("Manifest: {}", check.url);
    if !check.found {
        println!("  Not found");
        return Ok(());
    }

    if let Some(title) = &check.title {
        println!("  Title: {}", title);
    }
    println!("  Sections: {}", check.section_count);
    println!("  Links: {}", check.link_count);
    println!("  Same-host links: {}", check.same_host_link_count);

    Ok(())
}

/// Handles the --extract-links mode
async fn handle_extract_links(url: &str, selector: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = parse_origin(url)?;
    let client = build_http_client()?;

    let links = extract_links(&client, &page, selector).await?;

    println!("Links matching '{}' on {} ({}):", selector, page, links.len());
    for link in &links {
        println!("  - {} -> {}", link.title, link.url);
    }

    Ok(())
}
