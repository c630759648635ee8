//! Integration tests for the portfolio crawler
//!
//! These tests run the HTTP prober, the plain HTTP renderer, the summarizer client and
//! the batch pipeline against wiremock servers.

mod batch_tests;
mod crawl_tests;
mod resolve_tests;
mod summarizer_tests;

use portfolio_crawler::config::{Config, RendererKind};
use std::path::Path;

/// Configuration for tests: plain HTTP rendering, fast retries, files under `dir`
pub fn http_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.browser.renderer = RendererKind::Http;
    config.crawler.retry_attempts = 2;
    config.crawler.retry_delay_min = 0;
    config.crawler.retry_delay_max = 0;
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config.user_agent.pool = vec!["TestAgent/1.0".to_string()];
    config.output.database_path = dir.join("crawl.db").display().to_string();
    config.output.summary_path = dir.join("summary.md").display().to_string();
    config.output.csv_path = dir.join("profiles.csv").display().to_string();
    config
}

/// Strips the scheme so the resolver has to probe
pub fn bare_host(uri: &str) -> String {
    uri.trim_start_matches("http://").to_string()
}
