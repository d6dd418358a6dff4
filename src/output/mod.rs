//! Output module for scraped pages and run summaries
//!
//! This module handles:
//! - Tracking per-page outcomes across a concurrent batch
//! - Writing page Markdown to the per-site output directory
//! - Printing the final summary

pub mod stats;
mod writer;

pub use stats::{print_summary, OutcomeStats, OutcomeTracker, PageError};
pub use writer::{output_dir_for, page_path, sanitize_filename, write_page, MAX_FILENAME_LEN};
