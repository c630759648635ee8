//! HTTP fetcher implementation
//!
//! This module handles plain HTTP requests for the crawler:
//! - Building HTTP clients with bounded timeouts and redirect following
//! - Probing candidate URLs during resolution
//! - Classifying request failures into a closed set of `ProbeError` variants

use crate::config::CrawlerConfig;
use crate::ProbeError;
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, redirect::Policy, Client};

/// Maximum redirect hops followed while probing
const MAX_REDIRECTS: usize = 10;

/// A response to a probe that reached a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
}

impl ProbeResponse {
    /// Status codes of 400 and above count as failures
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Issues a single GET request and reports where it ended up
///
/// Implementations follow redirects. `user_agent` overrides the client's default
/// User-Agent header for this request only.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, user_agent: Option<&str>)
        -> Result<ProbeResponse, ProbeError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use portfolio_crawler::config::CrawlerConfig;
/// use portfolio_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Prober` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<ProbeResponse, ProbeError> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await.map_err(classify_error)?;
        let probe = ProbeResponse {
            final_url: response.url().to_string(),
            status: response.status().as_u16(),
        };

        // Drain the body so truncated transfers surface as failures
        if !probe.is_error() {
            response.bytes().await.map_err(classify_error)?;
        }

        Ok(probe)
    }
}

/// Maps a reqwest error onto a probe failure variant
///
/// # Error Classes
///
/// | Condition | Variant |
/// |-----------|---------|
/// | Bad URL / missing scheme | InvalidUrl |
/// | Timeout | Timeout |
/// | Connection refused, DNS, TLS | Connect |
/// | Too many redirects | Redirect |
/// | Truncated or undecodable body | Body |
/// | Anything else | Other |
pub fn classify_error(e: reqwest::Error) -> ProbeError {
    if e.is_builder() {
        ProbeError::InvalidUrl(e.to_string())
    } else if e.is_timeout() {
        ProbeError::Timeout
    } else if e.is_connect() {
        ProbeError::Connect(e.to_string())
    } else if e.is_redirect() {
        ProbeError::Redirect(e.to_string())
    } else if e.is_body() || e.is_decode() {
        ProbeError::Body(e.to_string())
    } else if let Some(status) = e.status() {
        ProbeError::Status(status.as_u16())
    } else {
        ProbeError::Other(e.to_string())
    }
}
