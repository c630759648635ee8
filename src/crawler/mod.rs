//! Crawler module for resolving, fetching and processing company websites
//!
//! This module contains the core crawling logic, including:
//! - HTTP probing used to resolve website strings
//! - Page rendering through headless Chrome or plain HTTP
//! - HTML text and link extraction
//! - Per-company crawl coordination
//! - The company batch pipeline

mod batch;
mod coordinator;
mod fetcher;
mod parser;
mod renderer;

pub use batch::{run_batch, BatchSummary};
pub use coordinator::{CrawlResult, CrawlTarget, SiteCrawler};
pub use fetcher::{build_http_client, classify_error, HttpProber, ProbeResponse, Prober};
pub use parser::{
    extract_content, normalize_fragment, normalize_text, ExtractedContent, FetchedPage,
    OutboundLinks,
};
pub use renderer::{fetch_page, BrowserSession, HttpRenderer, PageRenderer, WaitPolicy};
