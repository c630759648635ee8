//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Run tracking
//! - The append-only history of visited URLs
//! - Per-company crawl results

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::crawler::CrawlResult;
use crate::extract::{Platform, SocialLinks, SocialMap};
use crate::state::CrawlPhase;
use crate::CrawlerError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(CrawlerError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CrawlerError> {
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One fetched URL in the crawl history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub run_id: i64,
    pub company: String,
    pub url: String,
    pub visited_at: String,
}

/// A stored company crawl result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub run_id: i64,
    pub company: String,
    pub seed_url: String,
    pub resolved_url: Option<String>,
    pub best_email: String,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub phase: CrawlPhase,
}

impl ResultRecord {
    /// Flattens a crawl result into a row; the not-found sentinel stores no links
    pub fn from_crawl(run_id: i64, seed_url: &str, result: &CrawlResult) -> Self {
        let link = |platform| result.social_links.get(platform).map(str::to_string);
        Self {
            run_id,
            company: result.company_name.clone(),
            seed_url: seed_url.to_string(),
            resolved_url: result.resolved_url.clone(),
            best_email: result.best_email.clone(),
            facebook: link(Platform::Facebook),
            twitter: link(Platform::Twitter),
            linkedin: link(Platform::Linkedin),
            instagram: link(Platform::Instagram),
            phase: result.phase,
        }
    }

    /// Rebuilds the social links; an aborted crawl maps back to the sentinel
    pub fn social_links(&self) -> SocialLinks {
        if self.phase == CrawlPhase::Aborted {
            return SocialLinks::NotFound;
        }

        let mut map = SocialMap::new();
        for (platform, link) in [
            (Platform::Facebook, &self.facebook),
            (Platform::Twitter, &self.twitter),
            (Platform::Linkedin, &self.linkedin),
            (Platform::Instagram, &self.instagram),
        ] {
            if let Some(link) = link {
                map.insert(platform, link.clone());
            }
        }
        SocialLinks::Found(map)
    }
}
