//! Portfolio crawler main entry point
//!
//! This is the command-line interface for the portfolio company crawler.

use anyhow::Context;
use clap::Parser;
use portfolio_crawler::config::{load_config_with_hash, Config, RendererKind};
use portfolio_crawler::crawler::run_batch;
use portfolio_crawler::profile::{build_summarizer, read_companies};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Portfolio crawler: contact and profile enrichment for company websites
///
/// Reads a CSV of companies, crawls each company's website one page at a time,
/// and appends an enriched profile row (contact email, social media profiles and
/// profile answers) to the configured output CSV.
#[derive(Parser, Debug)]
#[command(name = "portfolio-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawls company websites for contact details", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Path to the company CSV file
    #[arg(
        value_name = "COMPANIES_CSV",
        required_unless_present_any = ["stats", "export_summary"]
    )]
    companies: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and list the companies without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Generate markdown summary from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        return handle_stats(&config);
    }
    if cli.export_summary {
        return handle_export_summary(&config);
    }

    let companies = cli
        .companies
        .context("A company CSV file is required")?;

    if cli.dry_run {
        handle_dry_run(&config, &companies)
    } else {
        handle_batch(&config, &companies, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("portfolio_crawler=info,warn"),
            1 => EnvFilter::new("portfolio_crawler=debug,info"),
            2 => EnvFilter::new("portfolio_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and lists the companies
fn handle_dry_run(config: &Config, companies_path: &Path) -> anyhow::Result<()> {
    println!("=== Portfolio Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Depth: {} (links on the seed page are followed once)", config.crawler.depth);
    match config.crawler.loading_wait_time {
        Some(ms) => println!("  Wait after navigation: {}ms", ms),
        None => println!("  Wait after navigation: random 3000-5000ms"),
    }
    println!(
        "  Timeouts: request {}s, connect {}s, navigation {}s",
        config.crawler.request_timeout,
        config.crawler.connect_timeout,
        config.crawler.navigation_timeout
    );
    println!(
        "  Retries after 403: {} ({}-{}ms apart)",
        config.crawler.retry_attempts, config.crawler.retry_delay_min, config.crawler.retry_delay_max
    );

    println!("\nBrowser:");
    let renderer = match config.browser.renderer {
        RendererKind::Headless => "headless chrome",
        RendererKind::Http => "plain http",
    };
    println!("  Renderer: {}", renderer);
    println!("  Headless: {}", config.browser.headless);
    println!("  Sandbox: {}", config.browser.sandbox);

    println!("\nUser Agents ({}):", config.user_agent.pool.len());
    for agent in &config.user_agent.pool {
        println!("  - {}", agent);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);
    println!("  Profiles: {}", config.output.csv_path);

    println!("\nSummarizer:");
    match &config.summarizer.endpoint {
        Some(endpoint) => println!(
            "  Endpoint: {} (timeout {}s, api key {})",
            endpoint,
            config.summarizer.timeout,
            if config.summarizer.api_key.is_some() { "set" } else { "unset" }
        ),
        None => println!("  Endpoint: none (profile answers stay empty)"),
    }

    let companies = read_companies(companies_path)?;
    println!("\nCompanies ({}):", companies.len());
    for company in &companies {
        println!("  - {} ({})", company.company, company.website);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} company websites", companies.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use portfolio_crawler::output::{load_statistics, print_statistics};
    use portfolio_crawler::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    use portfolio_crawler::output::{generate_markdown_summary, generate_summary};
    use portfolio_crawler::storage::SqliteStorage;

    println!("=== Exporting Crawl Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Loading crawl data from database...");
    let summary = generate_summary(&storage)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main batch run
async fn handle_batch(config: &Config, companies: &Path, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!("Starting batch over {}", companies.display());

    let summarizer =
        build_summarizer(&config.summarizer).context("Failed to build summarizer client")?;

    let summary = run_batch(config, companies, config_hash, summarizer.as_ref())
        .await
        .context("Batch run failed")?;

    tracing::info!(
        "Run {} done: {} companies, {} unreachable, {} with an email, {} pages",
        summary.run_id,
        summary.companies,
        summary.aborted,
        summary.emails_found,
        summary.pages_visited
    );
    println!("✓ Profiles written to: {}", config.output.csv_path);

    Ok(())
}
