//! Site crawler - per-company crawl orchestration
//!
//! One `SiteCrawler` owns one page renderer (and therefore one browser session) and
//! crawls companies strictly one page at a time:
//! - Resolving the website string into a reachable URL
//! - Fetching and extracting the seed page
//! - Fetching and extracting every page the seed links to (one level only)
//! - Aggregating page text into a contact email and page links into social profiles

use crate::config::{Config, RendererKind};
use crate::crawler::parser::FetchedPage;
use crate::crawler::renderer::{fetch_page, BrowserSession, HttpRenderer, PageRenderer};
use crate::crawler::{build_http_client, HttpProber};
use crate::extract::{aggregate_social_links, extract_emails, SocialLinks, EMAIL_NOT_FOUND};
use crate::state::{CrawlPhase, PhaseTracker};
use crate::url::{company_domain, site_root, sub_url, RetryPolicy, UrlResolver};
use crate::CrawlerError;
use std::collections::HashSet;
use std::sync::Arc;

/// Href that is never followed from the seed page
const ROOT_PATH: &str = "/";

/// A company to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub company_name: String,
    /// Website as recorded for the company, with or without a scheme
    pub seed_url: String,
}

impl CrawlTarget {
    pub fn new(company_name: impl Into<String>, seed_url: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            seed_url: seed_url.into(),
        }
    }
}

/// Outcome of one company crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub company_name: String,
    /// Discovered address, empty when none was found, or `EMAIL_NOT_FOUND` when aborted
    pub best_email: String,
    pub social_links: SocialLinks,
    /// URL the website resolved to; None when aborted
    pub resolved_url: Option<String>,
    /// Terminal phase: `Done` or `Aborted`
    pub phase: CrawlPhase,
    /// Non-empty extracted text of every fetched page, seed first
    pub documents: Vec<String>,
}

impl CrawlResult {
    /// Sentinel result for a website that never resolved
    pub fn not_found(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            best_email: EMAIL_NOT_FOUND.to_string(),
            social_links: SocialLinks::NotFound,
            resolved_url: None,
            phase: CrawlPhase::Aborted,
            documents: Vec::new(),
        }
    }
}

/// Crawls company websites one page at a time
pub struct SiteCrawler {
    resolver: UrlResolver,
    renderer: Box<dyn PageRenderer>,
    depth: u32,
    crawled_urls: Vec<String>,
}

impl SiteCrawler {
    /// Builds a crawler from configuration
    ///
    /// With the headless renderer this launches Chrome. A failed launch is not an
    /// error: the crawler still resolves URLs, but every page comes back empty.
    ///
    /// # Returns
    ///
    /// * `Ok(SiteCrawler)` - Ready to crawl
    /// * `Err(CrawlerError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, CrawlerError> {
        let client = build_http_client(&config.crawler)?;

        let resolver = UrlResolver::new(
            Arc::new(HttpProber::new(client.clone())),
            RetryPolicy::from_config(&config.crawler),
            &config.user_agent,
        );

        let renderer: Box<dyn PageRenderer> = match config.browser.renderer {
            RendererKind::Headless => {
                Box::new(BrowserSession::launch(&config.browser, &config.crawler))
            }
            RendererKind::Http => Box::new(HttpRenderer::new(client)),
        };

        Ok(Self::with_parts(resolver, renderer, config.crawler.depth))
    }

    /// Assembles a crawler from an existing resolver and renderer
    pub fn with_parts(resolver: UrlResolver, renderer: Box<dyn PageRenderer>, depth: u32) -> Self {
        Self {
            resolver,
            renderer,
            depth,
            crawled_urls: Vec::new(),
        }
    }

    /// Every URL this crawler has fetched (or tried to), in order
    pub fn crawled_urls(&self) -> &[String] {
        &self.crawled_urls
    }

    /// Crawls one company's website
    ///
    /// Never fails: an unresolvable website yields the sentinel result, and any page
    /// that cannot be fetched simply contributes nothing.
    pub async fn crawl(&mut self, target: &CrawlTarget) -> CrawlResult {
        let company = target.company_name.as_str();
        let mut tracker = PhaseTracker::new();
        tracing::info!("Crawling {} ({})", company, target.seed_url);

        let resolved = match self.resolver.resolve(&target.seed_url).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", company, e);
                enter(&mut tracker, company, CrawlPhase::Aborted);
                return CrawlResult::not_found(company);
            }
        };

        enter(&mut tracker, company, CrawlPhase::FetchingSeed);
        let seed_html = fetch_page(self.renderer.as_mut(), &resolved).await;
        self.crawled_urls.push(resolved.clone());
        let seed = FetchedPage::from_html(&resolved, seed_html);
        tracing::debug!(
            "Seed page {} has {} outbound links",
            resolved,
            seed.outbound_links.len()
        );

        enter(&mut tracker, company, CrawlPhase::FetchingSubpages);
        if self.depth > 1 {
            tracing::debug!(
                "Requested depth {}, following links from the seed page only",
                self.depth
            );
        }
        let subpages = self.fetch_subpages(&seed, &resolved).await;

        enter(&mut tracker, company, CrawlPhase::Aggregating);
        let pages: Vec<&FetchedPage> = std::iter::once(&seed).chain(subpages.iter()).collect();

        let documents: Vec<String> = pages
            .iter()
            .filter(|page| !page.extracted_text.is_empty())
            .map(|page| page.extracted_text.clone())
            .collect();

        let best_email = extract_emails(&documents.join(" "), &company_domain(&target.seed_url));
        let social_links = aggregate_social_links(pages.iter().map(|page| &page.social_links));

        enter(&mut tracker, company, CrawlPhase::Done);
        tracing::info!(
            "Finished {}: {} pages, email '{}', {} social links",
            company,
            pages.len(),
            best_email,
            social_links.len()
        );

        CrawlResult {
            company_name: company.to_string(),
            best_email,
            social_links: SocialLinks::Found(social_links),
            resolved_url: Some(resolved),
            phase: tracker.phase(),
            documents,
        }
    }

    /// Fetches the seed page's links in discovery order, skipping failures
    async fn fetch_subpages(&mut self, seed: &FetchedPage, resolved: &str) -> Vec<FetchedPage> {
        let site = site_root(resolved);
        let mut seen: HashSet<String> = HashSet::from([resolved.to_string()]);
        let mut pages = Vec::new();

        for href in seed.outbound_links.hrefs() {
            if href == ROOT_PATH {
                continue;
            }

            let url = sub_url(&site, href);
            if !seen.insert(url.clone()) {
                continue;
            }

            self.crawled_urls.push(url.clone());
            match self.renderer.render(&url).await {
                Ok(html) => {
                    tracing::debug!("Fetched sub-page {}", url);
                    pages.push(FetchedPage::from_html(&url, html));
                }
                Err(e) => tracing::warn!("Skipping sub-page {}: {}", url, e),
            }
        }

        pages
    }

    /// Releases the renderer; later crawls get empty pages
    pub fn close(&mut self) {
        self.renderer.close();
    }
}

fn enter(tracker: &mut PhaseTracker, company: &str, phase: CrawlPhase) {
    match tracker.advance(phase) {
        Ok(()) => tracing::debug!("{}: entering {}", company, phase),
        Err(e) => tracing::error!("{}: {}", company, e),
    }
}
