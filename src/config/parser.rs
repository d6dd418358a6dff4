use crate::config::types::{DomainConfig, FileConfig, ScrapeConfig};
use crate::config::validation::validate;
use crate::url::{extract_domain, parse_origin};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docsmith::config::load_file_config;
///
/// let config = load_file_config(Path::new("docsmith.toml")).unwrap();
/// println!("Configured sites: {}", config.domains.len());
/// ```
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_file_config(&content)
}

/// Parses the TOML text of a configuration file
pub fn parse_file_config(content: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the config they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration file and returns both the config and its hash
pub fn load_file_config_with_hash(path: &Path) -> Result<(FileConfig, String), ConfigError> {
    let config = load_file_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Builds the run configuration for `url`
///
/// # Priority
///
/// Later layers win:
///
/// 1. Built-in defaults
/// 2. The config file's `[defaults]` table
/// 3. The config file's table for the URL's hostname
/// 4. CLI overrides
///
/// The result is validated before it is returned.
pub fn resolve_config(
    url: &str,
    file: Option<&FileConfig>,
    overrides: &DomainConfig,
    dry_run: bool,
) -> Result<ScrapeConfig, ConfigError> {
    let origin = parse_origin(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    let mut config = ScrapeConfig::new(origin);

    if let Some(file) = file {
        config.apply(&file.defaults);

        let host = extract_domain(&config.url).unwrap_or_default();
        if let Some(domain) = file.domain(&host) {
            tracing::debug!("Applying config table for {}", host);
            config.apply(domain);
        }
    }

    config.apply(overrides);
    config.dry_run = dry_run;

    validate(&config)?;
    Ok(config)
}
