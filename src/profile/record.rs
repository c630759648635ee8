//! Company records in, enriched profiles out

use crate::crawler::CrawlResult;
use crate::extract::Platform;
use crate::profile::ProfileAnswers;
use crate::CrawlerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the company input file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyRecord {
    pub id: String,
    pub company: String,
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_sector: String,
    #[serde(default)]
    pub hq_main_office: String,
    #[serde(default)]
    pub vertex_entity: String,
    #[serde(default)]
    pub finance_stage: String,
    #[serde(default)]
    pub status: String,
}

/// Reads every company record from a CSV file with a header row
///
/// # Returns
///
/// * `Ok(Vec<CompanyRecord>)` - Records in file order
/// * `Err(CrawlerError)` - File missing or a row is malformed
pub fn read_companies(path: &Path) -> Result<Vec<CompanyRecord>, CrawlerError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut companies = Vec::new();
    for row in reader.deserialize() {
        companies.push(row?);
    }

    tracing::info!("Loaded {} companies from {}", companies.len(), path.display());
    Ok(companies)
}

/// One row of the enriched profile output file
///
/// Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    pub id: String,
    pub company: String,
    pub description: String,
    pub tech_sector: String,
    pub hq_main_office: String,
    pub vertex_entity: String,
    pub finance_stage: String,
    pub status: String,
    pub website: String,
    pub products: String,
    pub customer_partners: String,
    pub pricings: String,
    pub founders: String,
    pub email: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub instagram: String,
}

impl CompanyProfile {
    /// Combines the input record, summarizer answers and crawl result
    ///
    /// Platforms without a link, and every platform of an aborted crawl, are empty.
    pub fn new(record: &CompanyRecord, answers: &ProfileAnswers, crawl: &CrawlResult) -> Self {
        let link = |platform| {
            crawl
                .social_links
                .get(platform)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: record.id.clone(),
            company: record.company.clone(),
            description: record.description.clone(),
            tech_sector: record.tech_sector.clone(),
            hq_main_office: record.hq_main_office.clone(),
            vertex_entity: record.vertex_entity.clone(),
            finance_stage: record.finance_stage.clone(),
            status: record.status.clone(),
            website: record.website.clone(),
            products: answers.products.clone(),
            customer_partners: answers.customer_partners.clone(),
            pricings: answers.pricings.clone(),
            founders: answers.founders.clone(),
            email: crawl.best_email.clone(),
            facebook: link(Platform::Facebook),
            twitter: link(Platform::Twitter),
            linkedin: link(Platform::Linkedin),
            instagram: link(Platform::Instagram),
        }
    }
}
