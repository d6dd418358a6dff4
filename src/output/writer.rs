//! Markdown file output
//!
//! Pages are written to `<output root>/<host without www>/<sanitized title>.md`.
//! Two titles that sanitize to the same name write to the same file; the
//! later write wins.

use crate::url::host_without_www;
use crate::{Result, UrlError};
use std::path::{Path, PathBuf};
use url::Url;

/// Longest file stem produced by [`sanitize_filename`]
pub const MAX_FILENAME_LEN: usize = 100;

/// Turns a page title into a safe file stem
///
/// # Sanitization Steps
///
/// 1. Lowercase
/// 2. Replace every character outside `[a-z0-9_-]` with `-`
/// 3. Collapse runs of `-` and trim them from both ends
/// 4. Truncate to [`MAX_FILENAME_LEN`] characters
/// 5. Use `untitled` if nothing is left
///
/// # Examples
///
/// ```
/// use docsmith::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Getting Started: Install"), "getting-started-install");
/// assert_eq!(sanitize_filename("???"), "untitled");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    let mut last_was_dash = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            sanitized.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            sanitized.push('-');
            last_was_dash = true;
        }
    }

    let mut sanitized: String = sanitized
        .trim_matches('-')
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect();

    // Truncation can expose a trailing dash
    while sanitized.ends_with('-') {
        sanitized.pop();
    }

    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}

/// Returns the per-site output directory for an origin
pub fn output_dir_for(output_root: &Path, origin: &Url) -> Result<PathBuf> {
    let host = host_without_www(origin).ok_or(UrlError::MissingHost)?;
    Ok(output_root.join(host))
}

/// Returns the file path a page with this title is written to
pub fn page_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{}.md", sanitize_filename(title)))
}

/// Writes one page's Markdown, ensuring a trailing newline
///
/// The directory must already exist.
pub async fn write_page(dir: &Path, title: &str, content: &str) -> Result<PathBuf> {
    let path = page_path(dir, title);

    let mut body = content.to_string();
    if !body.ends_with('\n') {
        body.push('\n');
    }

    tokio::fs::write(&path, body).await?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}
