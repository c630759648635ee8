//! Output error and summary types
//!
//! This module defines the error type shared by the output writers and the
//! summary data rendered into reports.

use crate::extract::{Platform, EMAIL_NOT_FOUND};
use crate::storage::ResultRecord;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary of one batch run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,

    // Overall statistics
    pub pages_visited: u64,

    // Per-company results, in crawl order
    pub companies: Vec<ResultRecord>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_companies(&self) -> u64 {
        self.companies.len() as u64
    }

    /// Companies whose website never resolved
    pub fn companies_aborted(&self) -> u64 {
        self.companies
            .iter()
            .filter(|c| c.resolved_url.is_none())
            .count() as u64
    }

    /// Companies with a discovered contact email
    pub fn emails_found(&self) -> u64 {
        self.companies
            .iter()
            .filter(|c| !c.best_email.is_empty() && c.best_email != EMAIL_NOT_FOUND)
            .count() as u64
    }

    /// Number of companies with a link, per platform
    pub fn social_links_found(&self) -> BTreeMap<Platform, u64> {
        let mut counts = BTreeMap::new();
        for company in &self.companies {
            for platform in Platform::ALL {
                if company.social_links().get(platform).is_some() {
                    *counts.entry(platform).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Returns the share of companies whose website resolved, as a percentage
    pub fn resolution_rate(&self) -> f64 {
        let total = self.total_companies();
        if total == 0 {
            return 0.0;
        }
        ((total - self.companies_aborted()) as f64 / total as f64) * 100.0
    }

    /// Returns the share of companies with a contact email, as a percentage
    pub fn email_rate(&self) -> f64 {
        let total = self.total_companies();
        if total == 0 {
            return 0.0;
        }
        (self.emails_found() as f64 / total as f64) * 100.0
    }
}
