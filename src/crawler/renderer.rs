//! Page rendering back-ends
//!
//! A renderer turns an absolute URL into HTML. Two are provided:
//! - `BrowserSession`: a headless Chrome tab, for sites that build their content client-side
//! - `HttpRenderer`: a plain GET, for static sites or hosts without a browser
//!
//! Every method takes `&mut self`, so a renderer runs at most one navigation at a time.

use crate::config::{BrowserConfig, CrawlerConfig};
use crate::FetchError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;
use reqwest::Client;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// Bounds of the random settle wait after a navigation (milliseconds)
const SETTLE_WAIT_MIN_MS: u64 = 3000;
const SETTLE_WAIT_MAX_MS: u64 = 5000;

/// Retrieves the HTML of one page
#[async_trait]
pub trait PageRenderer: Send {
    async fn render(&mut self, url: &str) -> Result<String, FetchError>;

    /// Releases any held resources; rendering afterwards fails
    fn close(&mut self) {}
}

/// How long to let client-side rendering settle after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    Random { min: Duration, max: Duration },
    Fixed(Duration),
}

impl WaitPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        match config.loading_wait_time {
            Some(ms) => Self::Fixed(Duration::from_millis(ms)),
            None => Self::Random {
                min: Duration::from_millis(SETTLE_WAIT_MIN_MS),
                max: Duration::from_millis(SETTLE_WAIT_MAX_MS),
            },
        }
    }

    pub fn next_wait(&self) -> Duration {
        match *self {
            Self::Fixed(wait) => wait,
            Self::Random { min, max } if max > min => {
                let millis = rand::thread_rng()
                    .gen_range(min.as_millis() as u64..=max.as_millis() as u64);
                Duration::from_millis(millis)
            }
            Self::Random { min, .. } => min,
        }
    }
}

/// A headless Chrome browser with a single tab
///
/// Launched once per crawler. If the launch fails the session stays inactive and
/// every render returns `FetchError::SessionUnavailable`.
pub struct BrowserSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    wait: WaitPolicy,
}

impl BrowserSession {
    /// Launches Chrome, logging and returning an inactive session on failure
    pub fn launch(browser: &BrowserConfig, crawler: &CrawlerConfig) -> Self {
        let wait = WaitPolicy::from_config(crawler);
        match start_browser(browser, crawler.navigation_timeout()) {
            Ok((browser, tab)) => {
                tracing::info!("Browser session started");
                Self {
                    browser: Some(browser),
                    tab: Some(tab),
                    wait,
                }
            }
            Err(e) => {
                tracing::error!("Failed to start browser session: {}", e);
                Self::inactive(wait)
            }
        }
    }

    pub fn inactive(wait: WaitPolicy) -> Self {
        Self {
            browser: None,
            tab: None,
            wait,
        }
    }

    pub fn is_active(&self) -> bool {
        self.tab.is_some()
    }
}

fn start_browser(
    config: &BrowserConfig,
    navigation_timeout: Duration,
) -> anyhow::Result<(Browser, Arc<Tab>)> {
    let args: Vec<&OsStr> = config.args.iter().map(OsStr::new).collect();

    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .sandbox(config.sandbox)
        .args(args)
        .build()
        .map_err(|e| anyhow::anyhow!("invalid launch options: {}", e))?;

    let browser = Browser::new(options)?;
    let tab = browser.new_tab()?;
    tab.set_default_timeout(navigation_timeout);

    Ok((browser, tab))
}

#[async_trait]
impl PageRenderer for BrowserSession {
    async fn render(&mut self, url: &str) -> Result<String, FetchError> {
        let tab = self.tab.clone().ok_or(FetchError::SessionUnavailable)?;
        let navigation_error = |message: String| FetchError::Navigation {
            url: url.to_string(),
            message,
        };

        let target = url.to_string();
        let nav_tab = tab.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            nav_tab.navigate_to(&target)?.wait_until_navigated()?;
            Ok(())
        })
        .await
        .map_err(|e| navigation_error(e.to_string()))?
        .map_err(|e| navigation_error(e.to_string()))?;

        tokio::time::sleep(self.wait.next_wait()).await;

        tokio::task::spawn_blocking(move || tab.get_content())
            .await
            .map_err(|e| navigation_error(e.to_string()))?
            .map_err(|e| navigation_error(e.to_string()))
    }

    fn close(&mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(false) {
                tracing::debug!("Error closing browser tab: {}", e);
            }
        }
        if self.browser.take().is_some() {
            tracing::info!("Browser session closed");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Renders pages with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&mut self, url: &str) -> Result<String, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

/// Fetches rendered HTML, mapping every failure to an empty page
///
/// Failures are logged and never propagated: a page that cannot be fetched simply
/// contributes no text and no links.
pub async fn fetch_page(renderer: &mut dyn PageRenderer, url: &str) -> String {
    tracing::debug!("Fetching {}", url);
    match renderer.render(url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            String::new()
        }
    }
}
