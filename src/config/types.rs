use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the portfolio crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Requested crawl depth. Traversal only ever follows the seed page's own links.
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Fixed wait after each navigation (milliseconds). Random 3-5s when absent.
    #[serde(default)]
    pub loading_wait_time: Option<u64>,

    /// Whole-request timeout for HTTP probes (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout for HTTP probes (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Browser navigation timeout (seconds)
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Number of header-rotated retries after an HTTP 403
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Lower bound of the delay between 403 retries (milliseconds)
    #[serde(default = "default_retry_delay_min")]
    pub retry_delay_min: u64,

    /// Upper bound of the delay between 403 retries (milliseconds)
    #[serde(default = "default_retry_delay_max")]
    pub retry_delay_max: u64,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            loading_wait_time: None,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            navigation_timeout: default_navigation_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay_min: default_retry_delay_min(),
            retry_delay_max: default_retry_delay_max(),
        }
    }
}

/// Which back-end renders pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chrome, for pages that need client-side rendering
    Headless,
    /// Plain HTTP GET
    Http,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrowserConfig {
    #[serde(default = "default_renderer")]
    pub renderer: RendererKind,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_true")]
    pub sandbox: bool,

    /// Extra Chrome command-line flags
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            headless: true,
            sandbox: true,
            args: Vec::new(),
        }
    }
}

/// Browser-identifying request headers used when a site answers 403
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent_pool")]
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agent_pool(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(default = "default_summary_path")]
    pub summary_path: String,

    /// Path to the enriched company profile CSV (appended to)
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            summary_path: default_summary_path(),
            csv_path: default_csv_path(),
        }
    }
}

/// Question-answering service used for the profile columns
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SummarizerConfig {
    /// HTTP endpoint; profile answers stay empty when absent
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-question timeout (seconds)
    #[serde(default = "default_summarizer_timeout")]
    pub timeout: u64,
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout: default_summarizer_timeout(),
        }
    }
}

fn default_depth() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_min() -> u64 {
    3000
}

fn default_retry_delay_max() -> u64 {
    5000
}

fn default_renderer() -> RendererKind {
    RendererKind::Headless
}

fn default_true() -> bool {
    true
}

fn default_user_agent_pool() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_database_path() -> String {
    "./crawl.db".to_string()
}

fn default_summary_path() -> String {
    "./crawl_summary.md".to_string()
}

fn default_summarizer_timeout() -> u64 {
    60
}

fn default_csv_path() -> String {
    "./webscraped_data.csv".to_string()
}
