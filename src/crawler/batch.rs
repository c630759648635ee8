//! Company batch pipeline
//!
//! Feeds every company record through a fresh site crawler, asks the profile
//! questions over the crawled text and appends one enriched row per company.
//! Companies are processed strictly in file order.

use crate::config::Config;
use crate::crawler::{CrawlResult, CrawlTarget, SiteCrawler};
use crate::extract::EMAIL_NOT_FOUND;
use crate::output::ProfileCsvWriter;
use crate::profile::{
    answer_profile_questions, read_companies, CompanyProfile, CompanyRecord, DocumentSummarizer,
};
use crate::state::CrawlPhase;
use crate::storage::{open_storage, ResultRecord, RunStatus, SqliteStorage, Storage};
use crate::CrawlerError;
use std::path::Path;

/// Totals for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub run_id: i64,
    pub companies: u64,
    pub aborted: u64,
    pub emails_found: u64,
    pub pages_visited: u64,
}

impl BatchSummary {
    fn record(&mut self, result: &CrawlResult, pages: usize) {
        self.companies += 1;
        self.pages_visited += pages as u64;
        if result.phase == CrawlPhase::Aborted {
            self.aborted += 1;
        } else if !result.best_email.is_empty() && result.best_email != EMAIL_NOT_FOUND {
            self.emails_found += 1;
        }
    }
}

/// Runs the batch pipeline over a company CSV file
///
/// A run is recorded in the configured database; it is marked completed when every
/// company has been written, or failed when storage or output breaks mid-run.
///
/// # Arguments
///
/// * `config` - Crawler configuration
/// * `companies_path` - CSV of company records
/// * `config_hash` - Hash of the configuration file, stored with the run
/// * `summarizer` - Answers the profile questions
///
/// # Returns
///
/// * `Ok(BatchSummary)` - Every company was processed
/// * `Err(CrawlerError)` - The input, storage or output failed
pub async fn run_batch(
    config: &Config,
    companies_path: &Path,
    config_hash: &str,
    summarizer: &dyn DocumentSummarizer,
) -> Result<BatchSummary, CrawlerError> {
    let companies = read_companies(companies_path)?;

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(config_hash)?;
    tracing::info!("Starting batch run {} over {} companies", run_id, companies.len());

    let writer = ProfileCsvWriter::new(&config.output.csv_path);
    let start_time = std::time::Instant::now();

    let mut summary = BatchSummary {
        run_id,
        ..Default::default()
    };

    for (index, record) in companies.iter().enumerate() {
        let outcome =
            process_company(config, record, run_id, &mut storage, &writer, summarizer).await;

        match outcome {
            Ok((result, pages)) => summary.record(&result, pages),
            Err(e) => {
                tracing::error!("Batch run {} failed on {}: {}", run_id, record.company, e);
                if let Err(mark) = storage.update_run_status(run_id, RunStatus::Failed) {
                    tracing::error!("Could not mark run {} as failed: {}", run_id, mark);
                }
                return Err(e);
            }
        }

        tracing::info!(
            "Progress: {}/{} companies, {} pages",
            index + 1,
            companies.len(),
            summary.pages_visited
        );
    }

    storage.complete_run(run_id)?;

    tracing::info!(
        "Batch run {} completed: {} companies ({} unreachable) in {:?}",
        run_id,
        summary.companies,
        summary.aborted,
        start_time.elapsed()
    );

    Ok(summary)
}

/// Crawls, records and writes a single company
async fn process_company(
    config: &Config,
    record: &CompanyRecord,
    run_id: i64,
    storage: &mut SqliteStorage,
    writer: &ProfileCsvWriter,
    summarizer: &dyn DocumentSummarizer,
) -> Result<(CrawlResult, usize), CrawlerError> {
    let target = CrawlTarget::new(&record.company, &record.website);

    let mut crawler = SiteCrawler::new(config)?;
    let result = crawler.crawl(&target).await;
    let visited = crawler.crawled_urls().to_vec();
    crawler.close();

    for url in &visited {
        storage.record_visit(run_id, &record.company, url)?;
    }
    storage.save_result(&ResultRecord::from_crawl(run_id, &record.website, &result))?;

    let answers = answer_profile_questions(
        summarizer,
        &record.company,
        &record.website,
        &result.documents,
    )
    .await;

    writer.append(&CompanyProfile::new(record, &answers, &result))?;

    Ok((result, visited.len()))
}
