//! Output module for crawl reports
//!
//! This module handles:
//! - The [`CrawlReport`] returned by a finished crawl
//! - Rendering the report for the console
//! - Writing a markdown summary of the crawl

mod markdown;

pub use markdown::{format_markdown_summary, write_markdown_summary};

use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::time::Duration;

/// Everything known about a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The URL the crawl started from
    pub seed_url: String,

    /// Size of the worker pool
    pub workers: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Every URL admitted and processed, seed included; no duplicates
    pub crawled: Vec<String>,

    /// Subset of `crawled` whose fetch failed
    pub failed: Vec<String>,

    /// Distinct links rejected as out of scope (empty unless tracking is on)
    pub out_of_scope: Vec<String>,

    /// Distinct URLs the frontier admitted
    pub admitted: usize,

    /// Candidates the frontier dropped as already visited
    pub duplicates: usize,

    /// True if the crawl was cancelled before running out of work
    pub cancelled: bool,
}

impl CrawlReport {
    /// Number of crawled URLs
    pub fn total(&self) -> usize {
        self.crawled.len()
    }

    /// Returns true if `url` was crawled
    pub fn contains(&self, url: &str) -> bool {
        self.crawled.iter().any(|crawled| crawled == url)
    }

    /// Crawled URLs in lexicographic order
    pub fn sorted_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.crawled.iter().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Share of crawled URLs whose fetch succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        if self.crawled.is_empty() {
            return 0.0;
        }
        let succeeded = self.crawled.len() - self.failed.len();
        succeeded as f64 / self.crawled.len() as f64 * 100.0
    }
}

/// Renders a report for the console
///
/// Lists the worker count, the total, and every crawled URL in the order
/// the workers reported them.
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}x Workers found a total of {} valid Links:",
        report.workers,
        report.total()
    );
    for url in &report.crawled {
        let _ = writeln!(out, "  {}", url);
    }

    if !report.failed.is_empty() {
        let _ = writeln!(out, "\nFailed to fetch ({}):", report.failed.len());
        for url in &report.failed {
            let _ = writeln!(out, "  {}", url);
        }
    }

    if !report.out_of_scope.is_empty() {
        let _ = writeln!(
            out,
            "\nFound but out of scope ({}):",
            report.out_of_scope.len()
        );
        for url in &report.out_of_scope {
            let _ = writeln!(out, "  {}", url);
        }
    }

    if report.cancelled {
        let _ = writeln!(out, "\nCrawl was cancelled before completion");
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", render_report(report));
}

#[cfg(test)]
pub(crate) fn sample_report() -> CrawlReport {
    let started_at = "2024-01-01T00:00:00Z"
        .parse::<DateTime<Utc>>()
        .unwrap();
    CrawlReport {
        seed_url: "https://example.com/".to_string(),
        workers: 3,
        started_at,
        finished_at: started_at + chrono::Duration::seconds(2),
        elapsed: Duration::from_secs(2),
        crawled: vec![
            "https://example.com/".to_string(),
            "https://example.com/b".to_string(),
            "https://example.com/a".to_string(),
            "https://example.com/broken".to_string(),
        ],
        failed: vec!["https://example.com/broken".to_string()],
        out_of_scope: vec![],
        admitted: 4,
        duplicates: 2,
        cancelled: false,
    }
}
