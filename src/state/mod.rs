//! State module for tracking crawl progress
//!
//! Each company crawl moves through a fixed sequence of phases:
//!
//! ```text
//! Resolving -> FetchingSeed -> FetchingSubpages -> Aggregating -> Done
//!     |
//!     +-> Aborted
//! ```
//!
//! Only a failed resolution aborts; every later failure degrades to an empty page.

mod crawl_phase;

pub use crawl_phase::{CrawlPhase, PhaseTracker};
