//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl,
//! including timing, totals, failed fetches and the full URL list.

use crate::output::CrawlReport;
use crate::CrawlError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a crawl report
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(CrawlError::Io)` - Failed to write summary
pub fn write_markdown_summary(report: &CrawlReport, output_path: &Path) -> Result<(), CrawlError> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Site-Ripple Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed URL**: {}\n", report.seed_url));
    md.push_str(&format!("- **Workers**: {}\n", report.workers));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.elapsed.as_secs_f64()
    ));
    let status = if report.cancelled {
        "cancelled"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Crawled | {} |\n", report.total()));
    md.push_str(&format!("| Admitted | {} |\n", report.admitted));
    md.push_str(&format!("| Duplicates Dropped | {} |\n", report.duplicates));
    md.push_str(&format!("| Failed Fetches | {} |\n", report.failed.len()));
    md.push_str(&format!("| Out of Scope | {} |\n\n", report.out_of_scope.len()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    md.push_str("## Crawled URLs\n\n");
    for url in report.sorted_urls() {
        md.push_str(&format!("- {}\n", url));
    }
    md.push('\n');

    if !report.failed.is_empty() {
        md.push_str("## Failed Fetches\n\n");
        let mut failed: Vec<&String> = report.failed.iter().collect();
        failed.sort();
        for url in failed {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !report.out_of_scope.is_empty() {
        md.push_str("## Found but Out of Scope\n\n");
        for url in &report.out_of_scope {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md
}
