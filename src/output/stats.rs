//! Outcome tracking for a batch of pages
//!
//! This module aggregates per-page results as they complete, renders a
//! throttled progress line, and produces the final summary.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Minimum time between two progress lines
pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(500);

/// A page that failed, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub url: String,
    pub message: String,
}

/// Aggregate results of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeStats {
    /// Pages in the batch
    pub total: usize,

    /// Pages that reached success, failure or skip
    pub completed: usize,

    pub success: usize,
    pub failed: usize,
    pub skipped: usize,

    /// Pages started but not yet completed
    pub in_progress: usize,

    /// Failed pages in completion order
    pub errors: Vec<PageError>,

    pub started_at: DateTime<Utc>,

    /// Time from tracker creation to the snapshot
    pub duration: Duration,
}

impl OutcomeStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            success: 0,
            failed: 0,
            skipped: 0,
            in_progress: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// Returns true once every page has completed
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// Returns the success rate as a percentage of completed pages
    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        (self.success as f64 / self.completed as f64) * 100.0
    }
}

/// Thread-safe tracker of page lifecycles for one batch
///
/// Each page goes through exactly one `start()` followed by exactly one of
/// `success()`, `fail()` or `skip()`.
#[derive(Debug)]
pub struct OutcomeTracker {
    stats: Mutex<OutcomeStats>,
    started: Instant,
    last_render: Mutex<Option<Instant>>,
    render_interval: Duration,
}

impl OutcomeTracker {
    /// Creates a tracker for a batch of `total` pages
    pub fn new(total: usize) -> Self {
        Self::with_render_interval(total, DEFAULT_RENDER_INTERVAL)
    }

    pub fn with_render_interval(total: usize, render_interval: Duration) -> Self {
        Self {
            stats: Mutex::new(OutcomeStats::new(total)),
            started: Instant::now(),
            last_render: Mutex::new(None),
            render_interval,
        }
    }

    pub fn start(&self) {
        self.lock_stats().in_progress += 1;
        self.render_progress(false);
    }

    pub fn success(&self) {
        {
            let mut stats = self.lock_stats();
            Self::complete(&mut stats);
            stats.success += 1;
        }
        self.render_progress(false);
    }

    pub fn fail(&self, url: &str, message: &str) {
        {
            let mut stats = self.lock_stats();
            Self::complete(&mut stats);
            stats.failed += 1;
            stats.errors.push(PageError {
                url: url.to_string(),
                message: message.to_string(),
            });
        }
        self.render_progress(false);
    }

    pub fn skip(&self) {
        {
            let mut stats = self.lock_stats();
            Self::complete(&mut stats);
            stats.skipped += 1;
        }
        self.render_progress(false);
    }

    /// Returns a copy of the current counters
    pub fn snapshot(&self) -> OutcomeStats {
        let mut stats = self.lock_stats().clone();
        stats.duration = self.started.elapsed();
        stats
    }

    /// Renders a last progress line and returns the final counters
    pub fn finish(&self) -> OutcomeStats {
        self.render_progress(true);
        self.snapshot()
    }

    /// Logs a progress line unless one was logged within the render interval
    ///
    /// Returns true if a line was logged.
    pub fn render_progress(&self, force: bool) -> bool {
        {
            let mut last = self
                .last_render
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let due = match *last {
                Some(at) => now.duration_since(at) >= self.render_interval,
                None => true,
            };
            if !force && !due {
                return false;
            }
            *last = Some(now);
        }

        let stats = self.snapshot();
        tracing::info!(
            "Progress: {}/{} completed ({} ok, {} failed, {} skipped, {} in progress)",
            stats.completed,
            stats.total,
            stats.success,
            stats.failed,
            stats.skipped,
            stats.in_progress
        );
        true
    }

    fn complete(stats: &mut OutcomeStats) {
        stats.in_progress = stats.in_progress.saturating_sub(1);
        stats.completed += 1;
    }

    fn lock_stats(&self) -> MutexGuard<'_, OutcomeStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Prints the final summary of a batch to stdout
pub fn print_summary(stats: &OutcomeStats) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Total pages: {}", stats.total);
    println!("  Succeeded: {}", stats.success);
    println!("  Failed: {}", stats.failed);
    println!("  Skipped: {}", stats.skipped);
    println!("  Duration: {:.2}s", stats.duration.as_secs_f64());
    println!();

    if !stats.errors.is_empty() {
        println!("Failed Pages ({}):", stats.errors.len());
        for error in &stats.errors {
            println!("  - {}: {}", error.url, error.message);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages written)",
        stats.success_rate(),
        stats.success,
        stats.total
    );
}
