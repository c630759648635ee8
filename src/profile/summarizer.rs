//! Document summarizer seam
//!
//! Answering questions over free text is delegated to an external service. The crate
//! defines the interface, a JSON-over-HTTP client for such a service and a no-op
//! implementation used when no service is configured.
//!
//! # Wire format
//!
//! `POST <endpoint>` with body `{"documents": [...], "question": "..."}` and an optional
//! `Authorization: Bearer <api-key>` header. The service answers `{"answer": "..."}`.

use crate::config::SummarizerConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a summarizer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizerError {
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),

    #[error("summarizer failed: {0}")]
    Failed(String),
}

/// Answers a natural-language question from a list of text documents
#[async_trait]
pub trait DocumentSummarizer: Send + Sync {
    async fn answer(&self, documents: &[String], question: &str)
        -> Result<String, SummarizerError>;
}

/// Summarizer that always answers with an empty string
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSummarizer;

#[async_trait]
impl DocumentSummarizer for NoopSummarizer {
    async fn answer(
        &self,
        _documents: &[String],
        _question: &str,
    ) -> Result<String, SummarizerError> {
        Ok(String::new())
    }
}

/// Summarizer backed by an HTTP question-answering endpoint
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    documents: &'a [String],
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: String,
}

impl HttpSummarizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl DocumentSummarizer for HttpSummarizer {
    async fn answer(
        &self,
        documents: &[String],
        question: &str,
    ) -> Result<String, SummarizerError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&AnswerRequest { documents, question });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                SummarizerError::Unavailable(e.to_string())
            } else {
                SummarizerError::Failed(e.to_string())
            }
        })?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::TOO_MANY_REQUESTS
        ) {
            return Err(SummarizerError::Unavailable(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Failed(format!("HTTP {}: {}", status, body)));
        }

        let parsed: AnswerResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::Failed(format!("invalid response body: {}", e)))?;
        tracing::debug!("Summarizer answered {} chars", parsed.answer.len());

        Ok(parsed.answer)
    }
}

/// Picks the summarizer for a run: the HTTP client when an endpoint is configured
pub fn build_summarizer(
    config: &SummarizerConfig,
) -> Result<Box<dyn DocumentSummarizer>, reqwest::Error> {
    match &config.endpoint {
        Some(endpoint) => {
            tracing::info!("Profile questions go to {}", endpoint);
            Ok(Box::new(HttpSummarizer::new(
                endpoint.clone(),
                config.api_key.clone(),
                config.timeout(),
            )?))
        }
        None => {
            tracing::info!("No summarizer endpoint configured, profile answers stay empty");
            Ok(Box::new(NoopSummarizer))
        }
    }
}
