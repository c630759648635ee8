//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::CrawlPhase;
use crate::storage::{ResultRecord, RunRecord, RunStatus, VisitRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Unknown crawl phase in database: {0}")]
    UnknownPhase(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the batch pipeline
/// and the reporting commands.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Updates the status of a run
    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Counts all runs ever recorded
    fn count_runs(&self) -> StorageResult<u64>;

    // ===== Crawl History =====

    /// Appends one fetched URL to the crawl history
    fn record_visit(&mut self, run_id: i64, company: &str, url: &str) -> StorageResult<()>;

    /// Loads the crawl history of a run, oldest first
    fn load_visits(&self, run_id: i64) -> StorageResult<Vec<VisitRecord>>;

    /// Counts the visits of a run
    fn count_visits(&self, run_id: i64) -> StorageResult<u64>;

    // ===== Results =====

    /// Saves one company result and returns its row ID
    fn save_result(&mut self, record: &ResultRecord) -> StorageResult<i64>;

    /// Loads every result of a run, in the order they were saved
    fn load_results(&self, run_id: i64) -> StorageResult<Vec<ResultRecord>>;

    /// Counts results of a run by terminal phase
    fn count_results_by_phase(&self, run_id: i64) -> StorageResult<HashMap<CrawlPhase, u64>>;
}
