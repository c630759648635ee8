//! Configuration module for the portfolio crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing sections fall back to the defaults below.
//!
//! # Example
//!
//! ```no_run
//! use portfolio_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Retry attempts after 403: {}", config.crawler.retry_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, RendererKind, SummarizerConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
