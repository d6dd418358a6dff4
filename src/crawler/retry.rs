//! Retry executor with exponential backoff
//!
//! Wraps a single asynchronous operation and re-runs it on failure, waiting
//! `base_delay * 2^attempt` between attempts.
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Success | Return immediately |
//! | Failure on the final attempt | Propagate |
//! | Failure not matching any signature | Propagate immediately |
//! | Failure matching a signature | Sleep, then retry |

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Failure message fragments that mark a failure as transient
///
/// Matched case-insensitively as substrings of the failure message.
pub const RETRYABLE_SIGNATURES: &[&str] = &[
    "timeout",
    "timed out",
    "etimedout",
    "econnreset",
    "connection reset",
    "econnrefused",
    "connection refused",
    "enotfound",
    "dns",
    "http 429",
    "http 500",
    "http 502",
    "http 503",
    "http 504",
];

/// Retry settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Returns the backoff delay that follows the failed attempt `attempt` (0-based)
///
/// # Example
///
/// ```
/// use docsmith::crawler::backoff_delay;
/// use std::time::Duration;
///
/// assert_eq!(backoff_delay(100, 0), Duration::from_millis(100));
/// assert_eq!(backoff_delay(100, 2), Duration::from_millis(400));
/// ```
pub fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_delay_ms.saturating_mul(factor))
}

/// Returns true if the message contains any of the signatures, ignoring case
pub fn is_retryable(message: &str, signatures: &[&str]) -> bool {
    let message = message.to_lowercase();
    signatures
        .iter()
        .any(|signature| message.contains(&signature.to_lowercase()))
}

/// Runs `operation` up to `max_retries + 1` times
///
/// When `retryable` is `Some`, a failure whose message matches none of the
/// signatures is returned without further attempts. When it is `None`, every
/// failure is retried until the attempts run out.
///
/// # Example
///
/// ```
/// use docsmith::crawler::with_retry;
///
/// # async fn example() {
/// let result: Result<u32, String> = with_retry(|| async { Ok(7) }, 3, 100, None).await;
/// assert_eq!(result, Ok(7));
/// # }
/// ```
pub async fn with_retry<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    base_delay_ms: u64,
    retryable: Option<&[&str]>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if attempt >= max_retries {
            tracing::debug!("Giving up after {} attempts: {}", attempt + 1, error);
            return Err(error);
        }

        if let Some(signatures) = retryable {
            if !is_retryable(&error.to_string(), signatures) {
                tracing::debug!("Not retrying non-retryable failure: {}", error);
                return Err(error);
            }
        }

        let delay = backoff_delay(base_delay_ms, attempt);
        tracing::warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempt + 1,
            max_retries + 1,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
