//! URL handling module for the portfolio crawler
//!
//! This module provides website resolution (protocol variants, 403 retries),
//! sub-page URL construction, and domain extraction.

mod domain;
mod join;
mod resolve;

// Re-export main functions
pub use domain::{company_domain, email_matches_domain, extract_domain};
pub use join::{has_http_scheme, site_root, sub_url};
pub use resolve::{
    candidates, classify_probe, Candidates, ProbeOutcome, RetryPolicy, UrlResolver,
};
