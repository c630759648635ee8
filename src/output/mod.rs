//! Output module for enriched profiles and crawl reports
//!
//! This module handles:
//! - Appending enriched company profiles to the output CSV
//! - Generating markdown summaries of batch runs
//! - Printing crawl statistics

mod csv_output;
mod markdown;
pub mod stats;
mod summary;

pub use csv_output::ProfileCsvWriter;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use summary::{CrawlSummary, OutputError, OutputResult};

use crate::storage::Storage;
use crate::CrawlerError;

/// Generates a crawl summary for the latest run in storage
///
/// # Arguments
///
/// * `storage` - The storage backend containing crawl data
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Successfully generated summary
/// * `Err(CrawlerError)` - No run recorded, or a query failed
pub fn generate_summary(storage: &dyn Storage) -> Result<CrawlSummary, CrawlerError> {
    let run = storage
        .get_latest_run()?
        .ok_or_else(|| CrawlerError::Storage("No crawl runs found in database".to_string()))?;

    // Calculate duration if finished
    let duration_seconds = match (
        run.started_at.parse::<chrono::DateTime<chrono::Utc>>(),
        &run.finished_at,
    ) {
        (Ok(started), Some(finished_str)) => finished_str
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()
            .map(|finished| (finished - started).num_seconds().max(0) as u64),
        _ => None,
    };

    let pages_visited = storage.count_visits(run.id)?;
    let companies = storage.load_results(run.id)?;

    Ok(CrawlSummary {
        run_id: run.id,
        started_at: run.started_at,
        finished_at: run.finished_at,
        duration_seconds,
        status: run.status.to_db_string().to_string(),
        config_hash: run.config_hash,
        pages_visited,
        companies,
    })
}
