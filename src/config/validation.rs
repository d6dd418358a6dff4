use crate::config::types::ScrapeConfig;
use crate::ConfigError;
use scraper::Selector;

/// Largest accepted concurrency
pub const MAX_CONCURRENCY: usize = 100;

/// Largest accepted retry count
pub const MAX_RETRIES: u32 = 10;

/// Largest accepted base retry delay (milliseconds)
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &ScrapeConfig) -> Result<(), ConfigError> {
    validate_limits(config)?;
    validate_selectors(config)?;
    Ok(())
}

/// Validates numeric limits
fn validate_limits(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    if config.retry_base_delay_ms > MAX_RETRY_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "retry_delay must be <= {}ms, got {}ms",
            MAX_RETRY_DELAY_MS, config.retry_base_delay_ms
        )));
    }

    Ok(())
}

/// Validates the CSS selectors
fn validate_selectors(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.content_selector.is_empty() {
        return Err(ConfigError::Validation(
            "content selector cannot be empty".to_string(),
        ));
    }

    validate_selector("content", &config.content_selector)?;

    if config.follows_links() {
        validate_selector("follow", &config.follow_selector)?;
    }

    Ok(())
}

/// Validates that a selector parses as CSS
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("Invalid {} selector '{}': {}", name, selector, e))
    })?;
    Ok(())
}
