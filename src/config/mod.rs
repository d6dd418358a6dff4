//! Configuration module for Docsmith
//!
//! This module loads TOML configuration files and merges them with CLI
//! flags into the [`ScrapeConfig`] used for a run.
//!
//! # Example
//!
//! ```no_run
//! use docsmith::config::{load_file_config, resolve_config, DomainConfig};
//! use std::path::Path;
//!
//! let file = load_file_config(Path::new("docsmith.toml")).unwrap();
//! let config = resolve_config("https://docs.example/", Some(&file), &DomainConfig::default(), false).unwrap();
//! println!("Writing to {}", config.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    DomainConfig, FileConfig, ScrapeConfig, DEFAULT_CONCURRENCY, DEFAULT_CONTENT_SELECTOR,
    DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_DIR, DEFAULT_RETRY_DELAY_MS,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_file_config, load_file_config_with_hash, parse_file_config,
    resolve_config,
};
pub use validation::validate;
