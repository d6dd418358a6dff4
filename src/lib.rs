//! Docsmith: documentation sites to Markdown
//!
//! This crate discovers the pages of a documentation website and writes each
//! one to disk as Markdown. Pages are discovered from an `llms.txt` manifest,
//! from links matching a CSS selector, or taken as a single page, and each page
//! is resolved through a fallback chain of full-content passthrough, native
//! Markdown source probing, and HTML to Markdown conversion.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod manifest;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Docsmith operations
#[derive(Debug, Error)]
pub enum DocsmithError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Content selector '{selector}' matched nothing on {url}")]
    SelectorNotFound { selector: String, url: String },

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("No links matched follow selector '{selector}' on {url}")]
    NoLinksFound { selector: String, url: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Docsmith operations
pub type Result<T> = std::result::Result<T, DocsmithError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::ScrapeConfig;
pub use crawler::{check_manifest, discover, extract_links, scrape, DiscoveryOutcome, ScrapeMode};
pub use discovery::PageLink;
pub use manifest::{parse_manifest, ManifestDocument};
pub use output::{OutcomeStats, OutcomeTracker};
