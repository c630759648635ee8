//! Portfolio Crawler: company website crawling for profile enrichment
//!
//! This crate crawls a company's website (the seed page plus the pages it links to),
//! then picks out the most likely contact email and the company's social media profiles.
//! A batch pipeline feeds company records through the crawler and writes enriched
//! profile rows.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod profile;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure of a single HTTP probe
///
/// This is a closed set: the resolver decides between retrying, moving on to the
/// next protocol variant, or accepting, purely by matching on these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("redirect error: {0}")]
    Redirect(String),

    #[error("response body error: {0}")]
    Body(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Other(String),
}

impl ProbeError {
    /// Returns true for an HTTP 403 response, the only failure worth retrying
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Status(403))
    }
}

/// A website string could not be turned into a reachable URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no reachable URL for '{input}' (last error: {last_error})")]
    Unreachable {
        input: String,
        last_error: ProbeError,
    },

    #[error("empty website")]
    Empty,
}

/// Errors raised while retrieving a single page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("browser session is not available")]
    SessionUnavailable,

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, CrawlTarget, FetchedPage, SiteCrawler};
pub use extract::{extract_emails, Platform, SocialLinks};
pub use state::CrawlPhase;
