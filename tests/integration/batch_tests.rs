//! Integration tests for the company batch pipeline

use crate::http_config;
use async_trait::async_trait;
use portfolio_crawler::crawler::run_batch;
use portfolio_crawler::output::{format_markdown_summary, generate_summary, load_statistics};
use portfolio_crawler::profile::{DocumentSummarizer, NoopSummarizer, SummarizerError};
use portfolio_crawler::storage::{RunStatus, SqliteStorage, Storage};
use portfolio_crawler::CrawlPhase;
use std::io::Write;
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers from the page text with a repeated sentence; founders are unavailable
struct EchoSummarizer;

#[async_trait]
impl DocumentSummarizer for EchoSummarizer {
    async fn answer(&self, documents: &[String], question: &str) -> Result<String, SummarizerError> {
        if question.contains("founders") {
            return Err(SummarizerError::Unavailable("quota exceeded".to_string()));
        }
        if documents.iter().any(|doc| doc.contains("rockets")) {
            return Ok("Acme builds rockets. Acme builds rockets.".to_string());
        }
        Ok(String::new())
    }
}

fn write_companies(dir: &Path, rows: &[String]) -> PathBuf {
    let companies = dir.join("companies.csv");
    let mut file = std::fs::File::create(&companies).unwrap();
    writeln!(
        file,
        "id,company,website,description,tech_sector,hq_main_office,vertex_entity,finance_stage,status"
    )
    .unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    companies
}

async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body><p>Acme builds rockets</p>
            <a href="/contact">Contact</a>
            <a href="{}/linkedin.com/company/acme">LinkedIn</a>
            </body></html>"#,
            mock_server.uri()
        )))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Contact us at contact@acme.test</body></html>"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_batch_writes_profiles_and_records_run() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = http_config(dir.path());
    let companies = write_companies(
        dir.path(),
        &[
            format!("1,Acme,{},Rockets,Aerospace,Springfield,Fund I,Seed,Active", mock_server.uri()),
            "2,Ghost,127.0.0.1:1,Vapour,,,,,Closed".to_string(),
        ],
    );

    let summary = run_batch(&config, &companies, "hash123", &EchoSummarizer)
        .await
        .expect("Batch failed");

    assert_eq!(summary.companies, 2);
    assert_eq!(summary.aborted, 1);
    assert_eq!(summary.emails_found, 1);
    assert_eq!(summary.pages_visited, 3);

    // Output rows
    let mut reader = csv::Reader::from_path(&config.output.csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 18);
    assert_eq!(&headers[9], "products");
    assert_eq!(&headers[13], "email");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let acme = &rows[0];
    assert_eq!(&acme[1], "Acme");
    assert_eq!(&acme[9], "Acme builds rockets.");
    assert_eq!(&acme[12], "");
    assert_eq!(&acme[13], "contact@acme.test");
    assert_eq!(&acme[16], format!("{}/linkedin.com/company/acme", mock_server.uri()));

    let ghost = &rows[1];
    assert_eq!(&ghost[1], "Ghost");
    assert_eq!(&ghost[7], "Closed");
    assert_eq!(&ghost[9], "");
    assert_eq!(&ghost[13], "Email not found");

    // Storage
    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let run = storage.get_run(summary.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "hash123");
    assert_eq!(storage.count_visits(summary.run_id).unwrap(), 3);

    let results = storage.load_results(summary.run_id).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].phase, CrawlPhase::Done);
    assert_eq!(results[0].best_email, "contact@acme.test");
    assert_eq!(results[1].phase, CrawlPhase::Aborted);

    // Reports over the same run
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.total_companies, 2);
    assert_eq!(stats.emails_found, 1);

    let markdown = format_markdown_summary(&generate_summary(&storage).unwrap());
    assert!(markdown.contains("| Ghost | unreachable | Email not found |"));
    assert!(markdown.contains("| linkedin | 1 |"));
}

#[tokio::test]
async fn test_batch_appends_across_runs() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = http_config(dir.path());
    let companies = write_companies(
        dir.path(),
        &[format!("1,Acme,{},,,,,,", mock_server.uri())],
    );

    let first = run_batch(&config, &companies, "hash", &NoopSummarizer)
        .await
        .unwrap();
    let second = run_batch(&config, &companies, "hash", &NoopSummarizer)
        .await
        .unwrap();

    assert_ne!(first.run_id, second.run_id);

    let written = std::fs::read_to_string(&config.output.csv_path).unwrap();
    assert_eq!(written.lines().count(), 3);
    assert_eq!(written.matches("id,company,description").count(), 1);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_runs().unwrap(), 2);
}
