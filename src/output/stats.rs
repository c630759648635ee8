//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::state::CrawlPhase;
use crate::storage::{RunRecord, Storage};
use crate::CrawlerError;
use std::collections::HashMap;

/// Crawl statistics for the latest run
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of runs recorded in the database
    pub total_runs: u64,

    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Companies crawled in the latest run
    pub total_companies: u64,

    /// Count of companies by terminal phase
    pub companies_by_phase: HashMap<CrawlPhase, u64>,

    /// Pages fetched in the latest run
    pub pages_visited: u64,

    /// Companies with a discovered contact email
    pub emails_found: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics (all zero without runs)
/// * `Err(CrawlerError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, CrawlerError> {
    let total_runs = storage.count_runs()?;

    let Some(run) = storage.get_latest_run()? else {
        return Ok(CrawlStatistics {
            total_runs,
            ..Default::default()
        });
    };

    let companies_by_phase = storage.count_results_by_phase(run.id)?;
    let total_companies = companies_by_phase.values().sum();
    let pages_visited = storage.count_visits(run.id)?;

    let emails_found = storage
        .load_results(run.id)?
        .iter()
        .filter(|r| r.phase == CrawlPhase::Done && !r.best_email.is_empty())
        .count() as u64;

    Ok(CrawlStatistics {
        total_runs,
        latest_run: Some(run),
        total_companies,
        companies_by_phase,
        pages_visited,
        emails_found,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Runs recorded: {}", stats.total_runs);

    let Some(run) = &stats.latest_run else {
        println!("  No crawl runs found");
        return;
    };

    println!(
        "  Latest run: {} ({}, started {})",
        run.id,
        run.status.to_db_string(),
        run.started_at
    );
    println!("  Companies crawled: {}", stats.total_companies);
    println!("  Pages visited: {}", stats.pages_visited);
    println!();

    println!("Companies by Phase:");
    let mut phase_counts: Vec<_> = stats.companies_by_phase.iter().collect();
    phase_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (phase, count) in phase_counts {
        println!("  {}: {} ({:.1}%)", phase, count, percentage(*count, stats.total_companies));
    }
    println!();

    println!(
        "Email Rate: {:.1}% ({} / {} companies with a contact email)",
        percentage(stats.emails_found, stats.total_companies),
        stats.emails_found,
        stats.total_companies
    );
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}
