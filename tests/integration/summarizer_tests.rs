//! Integration tests for the HTTP summarizer client

use crate::http_config;
use portfolio_crawler::config::SummarizerConfig;
use portfolio_crawler::crawler::run_batch;
use portfolio_crawler::profile::{
    build_summarizer, DocumentSummarizer, HttpSummarizer, SummarizerError,
};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summarizer(mock_server: &MockServer, api_key: Option<&str>) -> HttpSummarizer {
    HttpSummarizer::new(
        format!("{}/answer", mock_server.uri()),
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .expect("Failed to build summarizer")
}

fn documents() -> Vec<String> {
    vec!["Acme builds rockets.".to_string()]
}

#[tokio::test]
async fn test_answer_posts_documents_and_question() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(header("authorization", "Bearer secret"))
        .and(body_string_contains("Acme builds rockets."))
        .and(body_string_contains("What does Acme make?"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"answer": "Rockets."}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = summarizer(&mock_server, Some("secret"))
        .answer(&documents(), "What does Acme make?")
        .await;

    assert_eq!(answer, Ok("Rockets.".to_string()));
}

#[tokio::test]
async fn test_overloaded_service_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let answer = summarizer(&mock_server, None).answer(&documents(), "What?").await;

    assert!(matches!(answer, Err(SummarizerError::Unavailable(_))));
}

#[tokio::test]
async fn test_server_error_and_bad_body_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(body_string_contains("broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/answer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = summarizer(&mock_server, None);

    match client.answer(&documents(), "broken").await {
        Err(SummarizerError::Failed(message)) => assert!(message.contains("boom")),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(matches!(
        client.answer(&documents(), "What?").await,
        Err(SummarizerError::Failed(_))
    ));
}

#[tokio::test]
async fn test_batch_fills_profile_from_configured_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Acme builds rockets</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(body_string_contains("main products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"answer": "Acme builds rockets. Acme builds rockets."}"#),
        )
        .mount(&mock_server)
        .await;

    // Every other question hits an overloaded service
    Mock::given(method("POST"))
        .and(path("/answer"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = http_config(dir.path());
    config.summarizer = SummarizerConfig {
        endpoint: Some(format!("{}/answer", mock_server.uri())),
        api_key: None,
        timeout: 5,
    };

    let companies = dir.path().join("companies.csv");
    let mut file = std::fs::File::create(&companies).unwrap();
    writeln!(file, "id,company,website").unwrap();
    writeln!(file, "1,Acme,{}", mock_server.uri()).unwrap();

    let summarizer = build_summarizer(&config.summarizer).unwrap();
    let summary = run_batch(&config, &companies, "hash", summarizer.as_ref())
        .await
        .expect("Batch failed");
    assert_eq!(summary.companies, 1);

    let mut reader = csv::Reader::from_path(&config.output.csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][9], "Acme builds rockets.");
    assert_eq!(&rows[0][10], "");
    assert_eq!(&rows[0][12], "");
}
