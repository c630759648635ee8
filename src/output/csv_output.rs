//! Enriched profile CSV output
//!
//! Profiles are appended to one CSV file across runs. The header row is written
//! only when the file is new or empty.

use crate::output::summary::OutputResult;
use crate::profile::CompanyProfile;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Appends company profiles to a CSV file
#[derive(Debug, Clone)]
pub struct ProfileCsvWriter {
    path: PathBuf,
}

impl ProfileCsvWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one profile row, flushing before returning
    pub fn append(&self, profile: &CompanyProfile) -> OutputResult<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(profile)?;
        writer.flush()?;

        tracing::debug!("Appended profile for {} to {}", profile.company, self.path.display());
        Ok(())
    }
}
