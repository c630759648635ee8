//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a batch run:
//! run metadata, overall hit rates, and one table row per company.

use crate::extract::Platform;
use crate::output::summary::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary from a crawl summary
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Portfolio Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", summary.run_id));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Companies**: {}\n",
        summary.total_companies()
    ));
    md.push_str(&format!(
        "- **Unreachable Websites**: {}\n",
        summary.companies_aborted()
    ));
    md.push_str(&format!("- **Pages Visited**: {}\n", summary.pages_visited));
    md.push_str(&format!(
        "- **Resolution Rate**: {:.2}%\n",
        summary.resolution_rate()
    ));
    md.push_str(&format!(
        "- **Email Rate**: {:.2}%\n\n",
        summary.email_rate()
    ));

    // Social links by platform
    let social = summary.social_links_found();
    md.push_str("## Social Links Found\n\n");
    md.push_str("| Platform | Companies |\n");
    md.push_str("|----------|-----------|\n");
    for platform in Platform::ALL {
        md.push_str(&format!(
            "| {} | {} |\n",
            platform,
            social.get(&platform).copied().unwrap_or(0)
        ));
    }
    md.push('\n');

    // Per-company results
    if !summary.companies.is_empty() {
        md.push_str("## Companies\n\n");
        md.push_str("| Company | Website | Email | Facebook | Twitter | LinkedIn | Instagram |\n");
        md.push_str("|---------|---------|-------|----------|---------|----------|-----------|\n");

        for company in &summary.companies {
            let website = company.resolved_url.as_deref().unwrap_or("unreachable");
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                cell(&company.company),
                cell(website),
                cell(&company.best_email),
                cell(company.facebook.as_deref().unwrap_or_default()),
                cell(company.twitter.as_deref().unwrap_or_default()),
                cell(company.linkedin.as_deref().unwrap_or_default()),
                cell(company.instagram.as_deref().unwrap_or_default()),
            ));
        }
        md.push('\n');
    }

    md
}

/// Escapes a value for use inside a table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
