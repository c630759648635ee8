//! Company profile enrichment
//!
//! The batch pipeline reads company records, crawls each website, asks a document
//! summarizer a fixed set of profile questions over the crawled page text, and writes
//! one enriched profile row per company.
//!
//! # Components
//!
//! - `CompanyRecord` / `read_companies`: the input rows
//! - `DocumentSummarizer`: the external question-answering service seam
//! - `HttpSummarizer`: the JSON-over-HTTP client for that service
//! - `ProfileQuestion`: the questions asked, with their tailored prompts
//! - `CompanyProfile`: the output row

mod questions;
mod record;
mod summarizer;

pub use questions::{answer_profile_questions, dedupe_sentences, ProfileAnswers, ProfileQuestion};
pub use record::{read_companies, CompanyProfile, CompanyRecord};
pub use summarizer::{
    build_summarizer, DocumentSummarizer, HttpSummarizer, NoopSummarizer, SummarizerError,
};
