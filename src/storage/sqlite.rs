//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::CrawlPhase;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ResultRecord, RunRecord, RunStatus, VisitRecord};
use crate::CrawlerError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(CrawlerError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CrawlerError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, CrawlerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

fn parse_phase(s: &str) -> StorageResult<CrawlPhase> {
    CrawlPhase::from_db_string(s).ok_or_else(|| StorageError::UnknownPhase(s.to_string()))
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE id = ?2",
            params![status.to_db_string(), run_id],
        )?;
        Ok(())
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        Ok(())
    }

    fn count_runs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Crawl History =====

    fn record_visit(&mut self, run_id: i64, company: &str, url: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO visits (run_id, company, url, visited_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, company, url, now],
        )?;
        Ok(())
    }

    fn load_visits(&self, run_id: i64) -> StorageResult<Vec<VisitRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, company, url, visited_at FROM visits WHERE run_id = ?1 ORDER BY id",
        )?;

        let visits = stmt
            .query_map(params![run_id], |row| {
                Ok(VisitRecord {
                    run_id: row.get(0)?,
                    company: row.get(1)?,
                    url: row.get(2)?,
                    visited_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(visits)
    }

    fn count_visits(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM visits WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Results =====

    fn save_result(&mut self, record: &ResultRecord) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO results (run_id, company, seed_url, resolved_url, best_email,
             facebook, twitter, linkedin, instagram, phase, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.run_id,
                record.company,
                record.seed_url,
                record.resolved_url,
                record.best_email,
                record.facebook,
                record.twitter,
                record.linkedin,
                record.instagram,
                record.phase.to_db_string(),
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn load_results(&self, run_id: i64) -> StorageResult<Vec<ResultRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, company, seed_url, resolved_url, best_email,
             facebook, twitter, linkedin, instagram, phase
             FROM results WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    ResultRecord {
                        run_id: row.get(0)?,
                        company: row.get(1)?,
                        seed_url: row.get(2)?,
                        resolved_url: row.get(3)?,
                        best_email: row.get(4)?,
                        facebook: row.get(5)?,
                        twitter: row.get(6)?,
                        linkedin: row.get(7)?,
                        instagram: row.get(8)?,
                        phase: CrawlPhase::Done,
                    },
                    row.get::<_, String>(9)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut record, phase)| {
                record.phase = parse_phase(&phase)?;
                Ok(record)
            })
            .collect()
    }

    fn count_results_by_phase(&self, run_id: i64) -> StorageResult<HashMap<CrawlPhase, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT phase, COUNT(*) FROM results WHERE run_id = ?1 GROUP BY phase")?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = HashMap::new();
        for (phase, count) in rows {
            counts.insert(parse_phase(&phase)?, count as u64);
        }
        Ok(counts)
    }
}
