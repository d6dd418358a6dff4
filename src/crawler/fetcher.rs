//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by Docsmith, including:
//! - Building the shared HTTP client
//! - GET requests with an optional `Accept` header
//! - Classifying transport failures into retryable signatures
//! - Fetching through the retry executor

use crate::crawler::retry::{with_retry, RetryPolicy, RETRYABLE_SIGNATURES};
use crate::DocsmithError;
use reqwest::{header::ACCEPT, redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

/// `Accept` header sent when probing for native Markdown sources
pub const ACCEPT_MARKDOWN: &str = "text/markdown, text/plain;q=0.9, */*;q=0.1";

/// `Accept` header sent when fetching full-content text documents
pub const ACCEPT_TEXT: &str = "text/plain, text/markdown;q=0.9, */*;q=0.1";

/// A completed HTTP exchange, whatever its status
#[derive(Debug)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// Final URL after redirects
    pub final_url: Url,

    /// Response body decoded as text
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// A failed fetch
///
/// The message starts with a failure class (`timeout`, `connection refused`,
/// `HTTP 503`, ...) so the retry executor can match it against its signatures.
/// The URL is kept apart from the message so it never influences that match.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub url: String,
    pub message: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<FetchFailure> for DocsmithError {
    fn from(failure: FetchFailure) -> Self {
        DocsmithError::Fetch {
            url: failure.url,
            message: failure.message,
        }
    }
}

/// Builds the HTTP client shared by every task of a run
///
/// # Example
///
/// ```no_run
/// use docsmith::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("docsmith/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a single GET request and reads the body
///
/// Any HTTP status is returned as a [`FetchResponse`]; only transport and body
/// decoding failures become a [`FetchFailure`].
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    accept: Option<&str>,
) -> Result<FetchResponse, FetchFailure> {
    let mut request = client.get(url.clone());
    if let Some(accept) = accept {
        request = request.header(ACCEPT, accept);
    }

    let response = request.send().await.map_err(|e| FetchFailure {
        url: url.to_string(),
        message: describe_transport_error(e),
    })?;

    let status = response.status();
    let final_url = response.url().clone();
    if final_url != *url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }

    let body = response.text().await.map_err(|e| FetchFailure {
        url: url.to_string(),
        message: describe_transport_error(e),
    })?;

    tracing::trace!("GET {} -> {} ({} bytes)", final_url, status, body.len());

    Ok(FetchResponse {
        status,
        final_url,
        body,
    })
}

/// Sends a single GET request and treats any non-2xx status as a failure
pub async fn fetch_success(
    client: &Client,
    url: &Url,
    accept: Option<&str>,
) -> Result<FetchResponse, FetchFailure> {
    let response = fetch_text(client, url, accept).await?;

    if !response.is_success() {
        return Err(FetchFailure {
            url: url.to_string(),
            message: describe_status(response.status),
        });
    }

    Ok(response)
}

/// Fetches a URL through the retry executor, returning the body on success
///
/// Transport failures and retryable statuses (429, 5xx) are retried per the
/// policy; anything else fails on the first attempt.
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    accept: Option<&str>,
    policy: &RetryPolicy,
) -> Result<String, DocsmithError> {
    let response = with_retry(
        || fetch_success(client, url, accept),
        policy.max_retries,
        policy.base_delay_ms,
        Some(RETRYABLE_SIGNATURES),
    )
    .await?;

    Ok(response.body)
}

/// Formats a status code as `HTTP <code> <reason>`
fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Classifies a transport error and renders it with its source chain
///
/// The URL is stripped first so it can never match a retry signature, and
/// causes whose text is already present are not repeated.
fn describe_transport_error(error: reqwest::Error) -> String {
    let error = error.without_url();

    let mut detail = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }

    let class = transport_class(&detail, error.is_timeout(), error.is_connect());
    format!("{}: {}", class, detail)
}

/// Picks the failure class that prefixes a transport error message
///
/// | Condition | Prefix |
/// |-----------|--------|
/// | Timeout | `timeout` |
/// | DNS lookup failure | `dns lookup failed (ENOTFOUND)` |
/// | Connection reset | `connection reset (ECONNRESET)` |
/// | Connection refused | `connection refused (ECONNREFUSED)` |
/// | Other connect failure (TLS, certificates) | `connect error` |
/// | Anything else | `request failed` |
fn transport_class(detail: &str, is_timeout: bool, is_connect: bool) -> &'static str {
    let lower = detail.to_lowercase();
    if is_timeout {
        "timeout"
    } else if lower.contains("dns error") || lower.contains("failed to lookup address") {
        "dns lookup failed (ENOTFOUND)"
    } else if lower.contains("connection reset") {
        "connection reset (ECONNRESET)"
    } else if lower.contains("connection refused") {
        "connection refused (ECONNREFUSED)"
    } else if is_connect {
        "connect error"
    } else {
        "request failed"
    }
}
